//! Frozen duplicate of a cloud's parcel state
//!
//! A [`CloudCopy`] is a deep value copy: it owns its own parcels and shares
//! nothing with the live population, so later mutation of the cloud never
//! shows through. It is created by [`SprayCloud::take_snapshot`] and never
//! modified afterwards.
//!
//! [`SprayCloud::take_snapshot`]: super::SprayCloud::take_snapshot

use super::statistics;
use crate::core_types::Parcel;
use serde::{Deserialize, Serialize};

/// Read-only snapshot of a spray cloud
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudCopy {
    parcels: Vec<Parcel>,
    average_parcel_mass: f32,
    total_mass: f32,
    time: f32,
    step: u64,
    atomization_model: String,
    breakup_model: String,
}

impl CloudCopy {
    pub(crate) fn capture(
        parcels: &[Parcel],
        time: f32,
        step: u64,
        atomization_model: &str,
        breakup_model: &str,
    ) -> Self {
        Self {
            parcels: parcels.to_vec(),
            average_parcel_mass: statistics::average_parcel_mass(parcels),
            total_mass: statistics::total_mass(parcels),
            time,
            step,
            atomization_model: atomization_model.to_string(),
            breakup_model: breakup_model.to_string(),
        }
    }

    pub fn parcels(&self) -> &[Parcel] {
        &self.parcels
    }

    pub fn len(&self) -> usize {
        self.parcels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parcels.is_empty()
    }

    /// The parcel with `id` as it was when the copy was taken
    pub fn parcel(&self, id: u64) -> Option<&Parcel> {
        self.parcels.iter().find(|p| p.id() == id)
    }

    /// Average parcel mass at capture time (kg)
    pub fn average_parcel_mass(&self) -> f32 {
        self.average_parcel_mass
    }

    /// Total liquid mass at capture time (kg)
    pub fn total_mass(&self) -> f32 {
        self.total_mass
    }

    /// Cloud time at capture (s)
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Number of completed timesteps at capture
    pub fn step(&self) -> u64 {
        self.step
    }

    pub fn atomization_model(&self) -> &str {
        &self.atomization_model
    }

    pub fn breakup_model(&self) -> &str {
        &self.breakup_model
    }
}
