//! Parcel storage with stable identifiers
//!
//! Parcels live in a dense `Vec` so that per-parcel physics can run over a
//! plain slice in parallel. An id → slot map keeps lookups and removals O(1);
//! removal swaps the last parcel into the freed slot.

use crate::core_types::{Parcel, ParcelSeed};
use rustc_hash::FxHashMap;

/// The mutable set of parcels owned by one cloud
#[derive(Debug, Clone, Default)]
pub struct ParcelPopulation {
    parcels: Vec<Parcel>,
    index: FxHashMap<u64, usize>,
    next_id: u64,
}

impl ParcelPopulation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.parcels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parcels.is_empty()
    }

    pub fn as_slice(&self) -> &[Parcel] {
        &self.parcels
    }

    /// Mutable access to the parcels for in-place physics
    ///
    /// Ids must not be changed through this slice.
    pub(crate) fn as_mut_slice(&mut self) -> &mut [Parcel] {
        &mut self.parcels
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Parcel> {
        self.parcels.iter()
    }

    pub fn get(&self, id: u64) -> Option<&Parcel> {
        self.index.get(&id).map(|&slot| &self.parcels[slot])
    }

    pub fn contains(&self, id: u64) -> bool {
        self.index.contains_key(&id)
    }

    /// Add a parcel built from `seed` and return its new id
    pub fn insert(&mut self, seed: ParcelSeed) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.index.insert(id, self.parcels.len());
        self.parcels.push(Parcel::from_seed(id, seed));
        id
    }

    /// Remove the parcel with `id`, if present
    pub fn remove(&mut self, id: u64) -> Option<Parcel> {
        let slot = self.index.remove(&id)?;
        let removed = self.parcels.swap_remove(slot);
        if let Some(moved) = self.parcels.get(slot) {
            self.index.insert(moved.id, slot);
        }
        Some(removed)
    }

    /// Keep only the parcels for which `keep` returns true
    ///
    /// Returns the number of parcels removed.
    pub fn retain<F>(&mut self, keep: F) -> usize
    where
        F: FnMut(&Parcel) -> bool,
    {
        let before = self.parcels.len();
        self.parcels.retain(keep);
        if self.parcels.len() != before {
            self.rebuild_index();
        }
        before - self.parcels.len()
    }

    /// Replace the whole population, keeping ids unique across the swap
    pub(crate) fn replace(&mut self, parcels: Vec<Parcel>) {
        let max_id = parcels.iter().map(|p| p.id + 1).max().unwrap_or(0);
        self.next_id = self.next_id.max(max_id);
        self.parcels = parcels;
        self.rebuild_index();
    }

    pub fn total_mass(&self) -> f32 {
        super::statistics::total_mass(&self.parcels)
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        self.index
            .extend(self.parcels.iter().enumerate().map(|(slot, p)| (p.id, slot)));
    }
}

impl<'a> IntoIterator for &'a ParcelPopulation {
    type Item = &'a Parcel;
    type IntoIter = std::slice::Iter<'a, Parcel>;

    fn into_iter(self) -> Self::IntoIter {
        self.parcels.iter()
    }
}
