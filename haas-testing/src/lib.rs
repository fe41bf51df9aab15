use std::{fs, path::Path};

use haas_geofence::{
    GeoPoint, GeofenceSettings, Punch, PunchDecision, PunchEvaluator, VenueRecords, VenueRegistry,
    distance_meters, is_within_radius,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

pub mod prelude {
    pub use anyhow::{Context, anyhow, bail};
    pub type Result<T = (), E = anyhow::Error> = std::result::Result<T, E>;
}

pub use prelude::*;

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load settings from the given file, or the defaults if none was passed
pub fn load_settings(path: Option<&Path>) -> Result<GeofenceSettings> {
    let settings = path
        .map(read_json::<GeofenceSettings>)
        .transpose()?
        .unwrap_or_default();
    settings.validate().context("Invalid geofence settings")?;
    Ok(settings)
}

pub fn parse_registry(raw: &str) -> Result<VenueRegistry> {
    let records = serde_json::from_str::<VenueRecords>(raw).context("Failed to parse venues")?;
    VenueRegistry::from_records(records)
}

pub fn parse_punches(raw: &str) -> Result<Vec<Punch>> {
    serde_json::from_str(raw).context("Failed to parse punches")
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckReport {
    pub distance_meters: f64,
    pub radius_meters: f64,
    pub within: bool,
}

impl CheckReport {
    pub fn new(point: GeoPoint, center: GeoPoint, radius_meters: f64) -> Self {
        Self {
            distance_meters: distance_meters(point, center),
            radius_meters,
            within: is_within_radius(point, center, radius_meters),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
/// One line of `evaluate` output
pub enum DecisionLine {
    Decision(Box<PunchDecision>),
    Error { error: String },
}

impl From<Result<PunchDecision>> for DecisionLine {
    fn from(value: Result<PunchDecision>) -> Self {
        match value {
            Ok(decision) => Self::Decision(Box::new(decision)),
            // Alternate format keeps the context chain
            Err(why) => Self::Error {
                error: format!("{why:#}"),
            },
        }
    }
}

pub fn evaluate_punches(
    registry: VenueRegistry,
    punches: Vec<Punch>,
    settings: GeofenceSettings,
) -> Result<Vec<DecisionLine>> {
    let evaluator = PunchEvaluator::new(registry, settings)?;
    Ok(evaluator
        .evaluate_all(punches)
        .into_iter()
        .map(DecisionLine::from)
        .collect())
}
