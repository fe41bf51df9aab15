use anyhow::bail;
use serde::{Deserialize, Serialize};

use crate::{prelude::*, venue::Venue};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Radius policy for attendance punches, set by an admin for the whole organization
pub struct GeofenceSettings {
    /// Radius in meters used for venues that don't set their own
    pub default_radius_meters: f64,
    /// Largest radius any venue may use, overrides above this are clamped down to it
    pub max_radius_meters: f64,
}

impl GeofenceSettings {
    pub fn validate(&self) -> Result {
        check_radius("Default radius", self.default_radius_meters)?;
        check_radius("Max radius", self.max_radius_meters)?;
        if self.default_radius_meters > self.max_radius_meters {
            bail!(
                "Default radius {}m is larger than max radius {}m",
                self.default_radius_meters,
                self.max_radius_meters
            );
        }
        Ok(())
    }

    /// The radius a punch at the given venue is checked against
    pub fn radius_for(&self, venue: &Venue) -> Result<f64> {
        let radius = venue.radius_meters.unwrap_or(self.default_radius_meters);
        check_radius("Venue radius", radius)
            .with_context(|| format!("Venue \"{}\" has an invalid radius", venue.name))?;
        Ok(radius.min(self.max_radius_meters))
    }
}

fn check_radius(what: &str, radius: f64) -> Result {
    if !radius.is_finite() || radius < 0.0 {
        bail!("{what} must be a finite non-negative number of meters, got {radius}");
    }
    Ok(())
}

impl Default for GeofenceSettings {
    fn default() -> Self {
        Self {
            default_radius_meters: 300.0,
            max_radius_meters: 500.0,
        }
    }
}
