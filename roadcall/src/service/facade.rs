//! DispatchService - the caller-facing facade.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::config::ServiceConfig;
use super::error::ServiceError;
use crate::actor::{Actor, ActorRole, PartyId};
use crate::coord::Coordinate;
use crate::events::{CompletionTrigger, RequestEvent, RequestEvents};
use crate::provider::{ProviderIndex, ProviderRecord};
use crate::request::{
    authorize_delete, authorize_transition, Request, RequestId, RequestStatus, RequestStore,
    ServiceCategory,
};
use crate::watcher::ProximityWatcher;

/// The dispatch core behind one facade.
///
/// Owns the provider index, the request store, and the lifecycle event
/// channel. Latitude/longitude inputs arrive as raw degrees from the outer
/// layers and are validated here; everything past this boundary works with
/// typed [`Coordinate`] values.
pub struct DispatchService {
    providers: Arc<ProviderIndex>,
    store: Arc<RequestStore>,
    events: RequestEvents,
    config: ServiceConfig,
}

impl DispatchService {
    /// Create a service with the given configuration.
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            providers: Arc::new(ProviderIndex::new()),
            store: Arc::new(RequestStore::new()),
            events: RequestEvents::new(config.event_capacity()),
            config,
        }
    }

    /// Create a service with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ServiceConfig::default())
    }

    // =========================================================================
    // Provider operations
    // =========================================================================

    /// Insert or replace a provider record.
    ///
    /// The single mutation entry point for provider presence: location and
    /// availability changes from the provider's client all land here (or in
    /// the two narrower setters below).
    ///
    /// # Errors
    ///
    /// [`ServiceError::InvalidCoordinate`] for malformed degrees.
    pub fn upsert_provider(
        &self,
        id: impl Into<PartyId>,
        latitude: f64,
        longitude: f64,
        available: bool,
        capabilities: Vec<String>,
    ) -> Result<ProviderRecord, ServiceError> {
        let coordinate = Coordinate::new(latitude, longitude)?;
        let record = ProviderRecord::new(id, coordinate)
            .with_availability(available)
            .with_capabilities(capabilities);
        debug!(provider = %record.id, %coordinate, available, "Provider upserted");
        self.providers.upsert(record.clone());
        Ok(record)
    }

    /// Flip a provider's availability flag.
    ///
    /// # Errors
    ///
    /// [`ServiceError::ProviderNotFound`] for an unknown id.
    pub fn set_provider_availability(
        &self,
        id: &PartyId,
        available: bool,
    ) -> Result<ProviderRecord, ServiceError> {
        self.providers
            .set_availability(id, available)
            .ok_or_else(|| ServiceError::ProviderNotFound(id.clone()))
    }

    /// Update a provider's live position.
    ///
    /// # Errors
    ///
    /// [`ServiceError::InvalidCoordinate`] for malformed degrees;
    /// [`ServiceError::ProviderNotFound`] for an unknown id.
    pub fn update_provider_location(
        &self,
        id: &PartyId,
        latitude: f64,
        longitude: f64,
    ) -> Result<ProviderRecord, ServiceError> {
        let coordinate = Coordinate::new(latitude, longitude)?;
        self.providers
            .update_location(id, coordinate)
            .ok_or_else(|| ServiceError::ProviderNotFound(id.clone()))
    }

    /// Find available providers near a point, nearest first, using the
    /// configured default radius.
    pub fn find_nearby_providers(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<(ProviderRecord, f64)>, ServiceError> {
        self.find_nearby_providers_within(latitude, longitude, self.config.search_radius_m())
    }

    /// Find available providers within `radius_m` meters of a point,
    /// nearest first with identity tie-break.
    ///
    /// An empty result is a valid (non-error) outcome.
    pub fn find_nearby_providers_within(
        &self,
        latitude: f64,
        longitude: f64,
        radius_m: f64,
    ) -> Result<Vec<(ProviderRecord, f64)>, ServiceError> {
        let origin = Coordinate::new(latitude, longitude)?;
        Ok(self.providers.find_nearby(&origin, radius_m, true))
    }

    // =========================================================================
    // Request operations
    // =========================================================================

    /// Create a request from `requester_id` against `provider_id`.
    ///
    /// Captures the requester's position and the provider's current
    /// position as creation-time snapshots, and emits the Created event.
    ///
    /// # Errors
    ///
    /// [`ServiceError::InvalidCoordinate`] for malformed degrees;
    /// [`ServiceError::ProviderNotFound`] if the provider is unknown.
    pub fn create_request(
        &self,
        requester_id: impl Into<PartyId>,
        provider_id: impl Into<PartyId>,
        latitude: f64,
        longitude: f64,
        category: ServiceCategory,
    ) -> Result<Request, ServiceError> {
        let requester_coordinate = Coordinate::new(latitude, longitude)?;
        let provider_id = provider_id.into();

        let provider = self
            .providers
            .get(&provider_id)
            .ok_or_else(|| ServiceError::ProviderNotFound(provider_id.clone()))?;

        let request = self.store.create(
            requester_id.into(),
            provider_id,
            requester_coordinate,
            provider.coordinate,
            category,
        );

        info!(
            request_id = %request.id,
            requester = %request.requester,
            provider = %request.provider,
            category = %request.category,
            distance_m = format!("{:.0}", request.distance_meters),
            "Request created"
        );
        self.events.publish(RequestEvent::Created(request.clone()));
        Ok(request)
    }

    /// Look up a request by id.
    pub fn get_request(&self, id: RequestId) -> Result<Request, ServiceError> {
        Ok(self.store.get(id)?)
    }

    /// Apply an explicit status transition on behalf of `actor`.
    ///
    /// Authorization observes the current status; the write is a
    /// compare-and-set against that observation, so a concurrent change
    /// (another actor, or the proximity watcher) surfaces as
    /// [`ServiceError::ConflictingStatus`] rather than a silent overwrite.
    ///
    /// # Errors
    ///
    /// [`ServiceError::RequestNotFound`], [`ServiceError::Unauthorized`],
    /// [`ServiceError::InvalidTransition`], or
    /// [`ServiceError::ConflictingStatus`].
    pub fn transition(
        &self,
        request_id: RequestId,
        actor: &Actor,
        target: RequestStatus,
    ) -> Result<Request, ServiceError> {
        let request = self.store.get(request_id)?;
        let observed = authorize_transition(&request, actor, target)?;
        let updated = self
            .store
            .compare_and_set_status(request_id, observed, target)?;

        info!(
            request_id = %updated.id,
            actor = %actor.id,
            from = %observed,
            to = %target,
            "Request transitioned"
        );

        let event = match target {
            RequestStatus::Accepted => RequestEvent::Accepted(updated.clone()),
            RequestStatus::Rejected => RequestEvent::Rejected(updated.clone()),
            RequestStatus::Cancelled => RequestEvent::Cancelled(updated.clone()),
            RequestStatus::Completed => RequestEvent::Completed {
                request: updated.clone(),
                trigger: CompletionTrigger::Provider,
            },
            // Unreachable: no transition back to pending is authorized
            RequestStatus::Pending => return Ok(updated),
        };
        self.events.publish(event);
        Ok(updated)
    }

    /// Requests the actor participates in that are still in flight
    /// (pending or accepted), newest first.
    pub fn list_active(&self, actor: &Actor) -> Vec<Request> {
        self.list_for(actor, |status| status.is_active())
    }

    /// Requests the actor participates in that have reached a terminal
    /// state (completed, rejected, or cancelled), newest first.
    pub fn list_history(&self, actor: &Actor) -> Vec<Request> {
        self.list_for(actor, |status| status.is_terminal())
    }

    /// Delete a request. Either party may delete, in any state; the
    /// deletion is out-of-band with respect to the state machine.
    ///
    /// # Errors
    ///
    /// [`ServiceError::RequestNotFound`] or [`ServiceError::Unauthorized`].
    pub fn delete_request(
        &self,
        request_id: RequestId,
        actor: &Actor,
    ) -> Result<Request, ServiceError> {
        let request = self.store.get(request_id)?;
        authorize_delete(&request, actor)?;
        let deleted = self.store.delete(request_id)?;
        info!(request_id = %deleted.id, actor = %actor.id, "Request deleted");
        Ok(deleted)
    }

    // =========================================================================
    // Events and background work
    // =========================================================================

    /// Subscribe to lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<RequestEvent> {
        self.events.subscribe()
    }

    /// Spawn the proximity watcher over this service's store and index.
    ///
    /// The task runs until `token` is cancelled.
    pub fn spawn_watcher(&self, token: CancellationToken) -> tokio::task::JoinHandle<()> {
        ProximityWatcher::new(
            Arc::clone(&self.store),
            Arc::clone(&self.providers),
            self.events.clone(),
            self.config.watcher().clone(),
        )
        .start(token)
    }

    fn list_for(&self, actor: &Actor, accept: impl Fn(RequestStatus) -> bool) -> Vec<Request> {
        let all = match actor.role {
            ActorRole::Requester => self.store.list_by_requester(&actor.id),
            ActorRole::Provider => self.store.list_by_provider(&actor.id),
        };
        all.into_iter()
            .filter(|request| accept(request.status))
            .collect()
    }
}
