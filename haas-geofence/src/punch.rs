use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    location::{GeoPoint, distance_meters, is_within_radius},
    prelude::*,
    settings::GeofenceSettings,
    venue::VenueDirectory,
};

pub type Id = Uuid;

/// Convenience alias for UTC DT
pub type UtcDT = DateTime<Utc>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PunchKind {
    CheckIn,
    CheckOut,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// A staff member scanning a piece of equipment's QR code to check in or out
pub struct Punch {
    pub staff_id: Id,
    /// The equipment whose QR code was scanned
    pub equipment_id: Id,
    pub kind: PunchKind,
    pub at: UtcDT,
    /// Where the staff member's device says they are
    pub location: GeoPoint,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PunchVerdict {
    /// Punch was within the venue's radius
    Accepted,
    /// Punch was too far from the venue
    OutOfRange,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Outcome of checking a [Punch] against its venue's geofence
pub struct PunchDecision {
    pub punch: Punch,
    pub venue_id: Id,
    pub distance_meters: f64,
    pub radius_meters: f64,
    pub verdict: PunchVerdict,
}

impl PunchDecision {
    pub fn is_accepted(&self) -> bool {
        self.verdict == PunchVerdict::Accepted
    }
}

/// Decides whether punches happened at the venue, looks venues up with a [VenueDirectory]
pub struct PunchEvaluator<V: VenueDirectory> {
    venues: V,
    settings: GeofenceSettings,
}

impl<V: VenueDirectory> PunchEvaluator<V> {
    pub fn new(venues: V, settings: GeofenceSettings) -> Result<Self> {
        settings
            .validate()
            .context("Invalid geofence settings")?;
        Ok(Self { venues, settings })
    }

    pub fn evaluate(&self, punch: Punch) -> Result<PunchDecision> {
        punch.location.validate().with_context(|| {
            format!("Staff {} reported an invalid location", punch.staff_id)
        })?;

        let venue = self
            .venues
            .venue_for_equipment(punch.equipment_id)
            .with_context(|| {
                format!(
                    "Equipment {} is not registered at any venue",
                    punch.equipment_id
                )
            })?;

        venue
            .location
            .validate()
            .with_context(|| format!("Venue \"{}\" has an invalid location", venue.name))?;

        let radius_meters = self.settings.radius_for(&venue)?;
        let distance = distance_meters(punch.location, venue.location);

        debug!(
            "{:?} by {} at \"{}\": {distance:.1}m from venue, radius {radius_meters}m",
            punch.kind, punch.staff_id, venue.name
        );

        let verdict = if is_within_radius(punch.location, venue.location, radius_meters) {
            info!(
                "Accepted {:?} for {} at \"{}\"",
                punch.kind, punch.staff_id, venue.name
            );
            PunchVerdict::Accepted
        } else {
            warn!(
                "Rejected {:?} for {} at \"{}\", {distance:.1}m away (allowed {radius_meters}m)",
                punch.kind, punch.staff_id, venue.name
            );
            PunchVerdict::OutOfRange
        };

        Ok(PunchDecision {
            punch,
            venue_id: venue.id,
            distance_meters: distance,
            radius_meters,
            verdict,
        })
    }

    /// Evaluate each punch on its own, a failure doesn't stop the rest
    pub fn evaluate_all(
        &self,
        punches: impl IntoIterator<Item = Punch>,
    ) -> Vec<Result<PunchDecision>> {
        punches.into_iter().map(|p| self.evaluate(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{MockVenues, mk_punch};

    fn mk_evaluator(radius_meters: Option<f64>) -> (PunchEvaluator<MockVenues>, Id) {
        let (venues, equipment) = MockVenues::single(radius_meters);
        let evaluator = PunchEvaluator::new(venues, GeofenceSettings::default()).unwrap();
        (evaluator, equipment)
    }

    #[test]
    fn test_accepts_nearby_punch() {
        let (evaluator, equipment) = mk_evaluator(None);
        let decision = evaluator.evaluate(mk_punch(equipment, 33.5922, 130.4017)).unwrap();
        assert!(decision.is_accepted());
        assert_eq!(decision.radius_meters, 300.0);
        assert!((decision.distance_meters - 200.0).abs() < 5.0);
    }

    #[test]
    fn test_rejects_far_punch() {
        let (evaluator, equipment) = mk_evaluator(None);
        let decision = evaluator.evaluate(mk_punch(equipment, 33.5949, 130.4017)).unwrap();
        assert_eq!(decision.verdict, PunchVerdict::OutOfRange);
    }

    #[test]
    fn test_boundary_punch_accepted() {
        let (evaluator, equipment) = mk_evaluator(None);
        let decision = evaluator.evaluate(mk_punch(equipment, 33.59309, 130.4017)).unwrap();
        assert!(decision.is_accepted());
    }

    #[test]
    fn test_venue_radius_override() {
        let (evaluator, equipment) = mk_evaluator(Some(500.0));
        let decision = evaluator.evaluate(mk_punch(equipment, 33.5944, 130.4017)).unwrap();
        assert_eq!(decision.radius_meters, 500.0);
        assert!(decision.is_accepted());
    }

    #[test]
    fn test_unknown_equipment() {
        let (evaluator, _) = mk_evaluator(None);
        let res = evaluator.evaluate(mk_punch(Uuid::new_v4(), 33.5904, 130.4017));
        assert!(res.is_err());
    }

    #[test]
    fn test_invalid_location_rejected() {
        let (evaluator, equipment) = mk_evaluator(None);
        assert!(evaluator.evaluate(mk_punch(equipment, f64::NAN, 130.4017)).is_err());
        assert!(evaluator.evaluate(mk_punch(equipment, 91.0, 130.4017)).is_err());
        assert!(evaluator.evaluate(mk_punch(equipment, 33.5904, f64::INFINITY)).is_err());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let (venues, _) = MockVenues::single(None);
        let settings = GeofenceSettings {
            default_radius_meters: -1.0,
            ..Default::default()
        };
        assert!(PunchEvaluator::new(venues, settings).is_err());
    }

    #[test]
    fn test_evaluate_all_keeps_going() {
        let (evaluator, equipment) = mk_evaluator(None);
        let punches = vec![
            mk_punch(equipment, 33.5904, 130.4017),
            mk_punch(Uuid::new_v4(), 33.5904, 130.4017),
            mk_punch(equipment, 33.5949, 130.4017),
        ];
        let results = evaluator.evaluate_all(punches);
        assert_eq!(results.len(), 3);
        assert!(results[0].as_ref().unwrap().is_accepted());
        assert!(results[1].is_err());
        assert!(!results[2].as_ref().unwrap().is_accepted());
    }

    #[test]
    fn test_decision_json() {
        let (evaluator, equipment) = mk_evaluator(None);
        let decision = evaluator.evaluate(mk_punch(equipment, 33.5904, 130.4017)).unwrap();
        let json = serde_json::to_value(&decision).unwrap();
        assert_eq!(json["verdict"], "accepted");
        assert_eq!(json["punch"]["kind"], "check_in");
        assert_eq!(json["distance_meters"], 0.0);
    }
}
