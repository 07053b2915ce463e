//! Provider record type.

use crate::actor::PartyId;
use crate::coord::Coordinate;

/// A provider's presence in the dispatch system.
///
/// Created at provider registration and updated on every location or
/// availability change. The `coordinate` field is the provider's live
/// position: the proximity watcher reads it on every evaluation cycle, so
/// it must always reflect the latest reported location.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRecord {
    /// Provider identity.
    pub id: PartyId,
    /// Current reported position.
    pub coordinate: Coordinate,
    /// Whether the provider is accepting new requests.
    pub available: bool,
    /// Service capability tags (e.g. "tyre", "battery").
    pub capabilities: Vec<String>,
}

impl ProviderRecord {
    /// Create an available record with no capability tags.
    pub fn new(id: impl Into<PartyId>, coordinate: Coordinate) -> Self {
        Self {
            id: id.into(),
            coordinate,
            available: true,
            capabilities: Vec::new(),
        }
    }

    /// Set the availability flag.
    pub fn with_availability(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    /// Set the capability tags.
    pub fn with_capabilities(mut self, capabilities: Vec<String>) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Whether this provider carries the given capability tag.
    pub fn has_capability(&self, tag: &str) -> bool {
        self.capabilities.iter().any(|c| c == tag)
    }
}
