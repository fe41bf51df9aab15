use std::collections::HashMap;

use anyhow::bail;
use serde::{Deserialize, Serialize};

use crate::{location::GeoPoint, prelude::*, punch::Id};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// A place staff check in and out at
pub struct Venue {
    pub id: Id,
    pub name: String,
    /// Where the venue is registered, punches are measured against this
    pub location: GeoPoint,
    /// Per-venue radius, falls back to the organization default when unset
    #[serde(default)]
    pub radius_meters: Option<f64>,
}

/// Resolves scanned equipment to the venue it's registered at
pub trait VenueDirectory {
    fn venue_for_equipment(&self, equipment_id: Id) -> Option<Venue>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
/// On-disk / over-the-wire shape of a [VenueRegistry]
pub struct VenueRecords {
    pub venues: Vec<Venue>,
    /// Equipment ID -> venue ID
    #[serde(default)]
    pub equipment: HashMap<Id, Id>,
}

#[derive(Debug, Clone, Default)]
/// In-memory [VenueDirectory]
pub struct VenueRegistry {
    venues: HashMap<Id, Venue>,
    equipment: HashMap<Id, Id>,
}

impl VenueRegistry {
    pub fn from_records(records: VenueRecords) -> Result<Self> {
        let mut registry = Self::default();
        for venue in records.venues {
            registry.register_venue(venue);
        }
        for (equipment_id, venue_id) in records.equipment {
            registry.register_equipment(equipment_id, venue_id)?;
        }
        Ok(registry)
    }

    /// Add or replace a venue
    pub fn register_venue(&mut self, venue: Venue) {
        self.venues.insert(venue.id, venue);
    }

    /// Attach a piece of equipment to a venue, re-attaching it if it was elsewhere
    pub fn register_equipment(&mut self, equipment_id: Id, venue_id: Id) -> Result {
        if !self.venues.contains_key(&venue_id) {
            bail!("Can't register equipment {equipment_id}, venue {venue_id} doesn't exist");
        }
        self.equipment.insert(equipment_id, venue_id);
        Ok(())
    }

    pub fn venue(&self, id: Id) -> Option<&Venue> {
        self.venues.get(&id)
    }

    pub fn len(&self) -> usize {
        self.venues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }
}

impl VenueDirectory for VenueRegistry {
    fn venue_for_equipment(&self, equipment_id: Id) -> Option<Venue> {
        self.equipment
            .get(&equipment_id)
            .and_then(|venue_id| self.venues.get(venue_id))
            .cloned()
    }
}
