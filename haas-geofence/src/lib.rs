mod location;
mod punch;
mod settings;
mod venue;

pub use location::{EARTH_RADIUS_M, GeoPoint, LocationComponent, distance_meters, is_within_radius};
pub use punch::{Id, Punch, PunchDecision, PunchEvaluator, PunchKind, PunchVerdict, UtcDT};
pub use settings::GeofenceSettings;
pub use venue::{Venue, VenueDirectory, VenueRecords, VenueRegistry};

pub mod prelude {
    use anyhow::Error as AnyhowError;
    use std::result::Result as StdResult;
    pub type Result<T = (), E = AnyhowError> = StdResult<T, E>;
    pub use anyhow::Context;
}
