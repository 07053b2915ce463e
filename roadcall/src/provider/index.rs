//! ProviderIndex - in-memory geospatial provider store.
//!
//! Keyed by provider identity. `upsert` is the single mutation entry point
//! for full records; `set_availability` and `update_location` are
//! conveniences that route through the same entry. Nearby queries scan the
//! index, which is adequate for the fleet sizes this core serves; the
//! persistent-store collaborator takes over when a real 2dsphere index is
//! needed.

use dashmap::DashMap;

use super::record::ProviderRecord;
use crate::actor::PartyId;
use crate::coord::{distance_meters, Coordinate};

/// In-memory provider index.
///
/// # Thread Safety
///
/// Record-level access via `DashMap` (concurrent reads, per-shard write
/// locks). A location update for one provider never contends with queries
/// touching other providers.
#[derive(Debug, Default)]
pub struct ProviderIndex {
    records: DashMap<PartyId, ProviderRecord>,
}

impl ProviderIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    /// Insert or replace a provider's record.
    ///
    /// Idempotent: re-upserting an identical record is a no-op in effect.
    pub fn upsert(&self, record: ProviderRecord) {
        self.records.insert(record.id.clone(), record);
    }

    /// Get a cloned record, or `None` if the provider is unknown.
    pub fn get(&self, id: &PartyId) -> Option<ProviderRecord> {
        self.records.get(id).map(|entry| entry.value().clone())
    }

    /// Flip a provider's availability flag in place.
    ///
    /// Returns the updated record, or `None` if the provider is unknown.
    pub fn set_availability(&self, id: &PartyId, available: bool) -> Option<ProviderRecord> {
        let mut entry = self.records.get_mut(id)?;
        entry.available = available;
        Some(entry.value().clone())
    }

    /// Replace a provider's live coordinate in place.
    ///
    /// Returns the updated record, or `None` if the provider is unknown.
    pub fn update_location(&self, id: &PartyId, coordinate: Coordinate) -> Option<ProviderRecord> {
        let mut entry = self.records.get_mut(id)?;
        entry.coordinate = coordinate;
        Some(entry.value().clone())
    }

    /// Remove a provider's record (account deletion).
    ///
    /// Returns the removed record, or `None` if it didn't exist.
    pub fn remove(&self, id: &PartyId) -> Option<ProviderRecord> {
        self.records.remove(id).map(|(_, record)| record)
    }

    /// Number of records in the index.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the index holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Find providers within `radius_m` meters of `origin`, nearest first.
    ///
    /// The radius is inclusive of the boundary. With `available_only` set,
    /// records whose availability flag is off are excluded. Equidistant
    /// providers are ordered by identity ascending, so results are
    /// deterministic.
    pub fn find_nearby(
        &self,
        origin: &Coordinate,
        radius_m: f64,
        available_only: bool,
    ) -> Vec<(ProviderRecord, f64)> {
        self.find_nearby_filtered(origin, radius_m, available_only, |_| true)
    }

    /// Like [`find_nearby`](Self::find_nearby), restricted to providers
    /// carrying the given capability tag.
    pub fn find_nearby_with_capability(
        &self,
        origin: &Coordinate,
        radius_m: f64,
        available_only: bool,
        capability: &str,
    ) -> Vec<(ProviderRecord, f64)> {
        self.find_nearby_filtered(origin, radius_m, available_only, |record| {
            record.has_capability(capability)
        })
    }

    fn find_nearby_filtered(
        &self,
        origin: &Coordinate,
        radius_m: f64,
        available_only: bool,
        accept: impl Fn(&ProviderRecord) -> bool,
    ) -> Vec<(ProviderRecord, f64)> {
        let mut matches: Vec<(ProviderRecord, f64)> = self
            .records
            .iter()
            .filter(|entry| !available_only || entry.value().available)
            .filter(|entry| accept(entry.value()))
            .filter_map(|entry| {
                let record = entry.value();
                let distance = distance_meters(origin, &record.coordinate);
                (distance <= radius_m).then(|| (record.clone(), distance))
            })
            .collect();

        matches.sort_by(|(a, da), (b, db)| {
            da.partial_cmp(db)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });

        matches
    }
}
