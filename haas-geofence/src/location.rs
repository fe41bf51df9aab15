use anyhow::bail;
use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// A "part" of a location
pub type LocationComponent = f64;

/// Mean radius of the Earth in meters, the sphere all distances are measured on
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
/// Some point on the Earth as reported by a device's GPS or registered for a venue
pub struct GeoPoint {
    /// Latitude in degrees
    #[serde(alias = "latitude")]
    pub lat: LocationComponent,
    /// Longitude in degrees
    #[serde(alias = "longitude")]
    pub long: LocationComponent,
}

impl GeoPoint {
    /// Create a point, failing if either component is non-finite or out of its degree range.
    ///
    /// Latitude must be in \[-90, 90\] and longitude in \[-180, 180\].
    pub fn try_new(lat: LocationComponent, long: LocationComponent) -> Result<Self> {
        let point = Self { lat, long };
        point.validate()?;
        Ok(point)
    }

    /// Check an already-built point (e.g. one deserialized from a request)
    pub fn validate(&self) -> Result {
        if !self.lat.is_finite() || !self.long.is_finite() {
            bail!("Coordinate ({}, {}) is not finite", self.lat, self.long);
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            bail!("Latitude {} is outside [-90, 90]", self.lat);
        }
        if !(-180.0..=180.0).contains(&self.long) {
            bail!("Longitude {} is outside [-180, 180]", self.long);
        }
        Ok(())
    }
}

/// Great-circle distance in meters between two points using the Haversine formula.
///
/// Inputs are not re-validated, any numeric input gives a numeric output. NaN components
/// propagate to a NaN distance.
pub fn distance_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let delta_phi = (b.lat - a.lat).to_radians();
    let delta_lambda = (b.long - a.long).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    // Rounding can push h just past 1 for antipodal points, clamp keeps NaN as NaN
    let h = h.clamp(0.0, 1.0);

    let central_angle = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * central_angle
}

/// Whether `point` lies within `radius_meters` of `center`, the boundary counts as inside.
pub fn is_within_radius(point: GeoPoint, center: GeoPoint, radius_meters: f64) -> bool {
    distance_meters(point, center) <= radius_meters
}
