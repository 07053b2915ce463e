//! RequestStore - in-memory request storage with atomic status updates.
//!
//! # Thread Safety
//!
//! Requests live in a `DashMap`; the entry lock taken by
//! [`compare_and_set_status`](RequestStore::compare_and_set_status) is the
//! sole serialization point per request. Transitions on unrelated requests
//! never contend, and there is no global lock.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use dashmap::DashMap;

use super::error::RequestError;
use super::model::{Request, RequestId, RequestStatus, ServiceCategory};
use crate::actor::PartyId;
use crate::coord::{distance_meters, Coordinate};

/// In-memory request store.
#[derive(Debug, Default)]
pub struct RequestStore {
    requests: DashMap<RequestId, Request>,
    next_id: AtomicU64,
}

impl RequestStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            requests: DashMap::new(),
            next_id: AtomicU64::new(0),
        }
    }

    /// Create a request in `pending` status and return it.
    ///
    /// Both coordinates are captured as creation-time snapshots, along with
    /// the great-circle distance between them.
    pub fn create(
        &self,
        requester: PartyId,
        provider: PartyId,
        requester_coordinate: Coordinate,
        provider_coordinate: Coordinate,
        category: ServiceCategory,
    ) -> Request {
        let id = RequestId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let now = Utc::now();
        let request = Request {
            id,
            requester,
            provider,
            requester_coordinate,
            provider_coordinate,
            distance_meters: distance_meters(&requester_coordinate, &provider_coordinate),
            status: RequestStatus::Pending,
            category,
            created_at: now,
            status_changed_at: now,
        };
        self.requests.insert(id, request.clone());
        request
    }

    /// Look up a request by id.
    ///
    /// # Errors
    ///
    /// [`RequestError::NotFound`] if no such request exists.
    pub fn get(&self, id: RequestId) -> Result<Request, RequestError> {
        self.requests
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(RequestError::NotFound(id))
    }

    /// All requests created by `requester`, newest first.
    pub fn list_by_requester(&self, requester: &PartyId) -> Vec<Request> {
        self.list_filtered(|request| request.requester == *requester)
    }

    /// All requests assigned to `provider`, newest first.
    pub fn list_by_provider(&self, provider: &PartyId) -> Vec<Request> {
        self.list_filtered(|request| request.provider == *provider)
    }

    /// All requests currently in `status`, in id order.
    ///
    /// The proximity watcher uses this to enumerate `accepted` requests on
    /// every evaluation tick.
    pub fn list_by_status(&self, status: RequestStatus) -> Vec<Request> {
        let mut matches: Vec<Request> = self
            .requests
            .iter()
            .filter(|entry| entry.value().status == status)
            .map(|entry| entry.value().clone())
            .collect();
        matches.sort_by_key(|request| request.id);
        matches
    }

    /// Atomically set the status to `new` if it is still `expected`.
    ///
    /// The entry lock makes the check-and-write atomic with respect to
    /// concurrent callers: of N racers on the same (id, expected) pair,
    /// exactly one succeeds and the rest observe the changed status.
    ///
    /// # Errors
    ///
    /// [`RequestError::NotFound`] if the request doesn't exist;
    /// [`RequestError::ConflictingStatus`] if the stored status does not
    /// match `expected` at the moment of update.
    pub fn compare_and_set_status(
        &self,
        id: RequestId,
        expected: RequestStatus,
        new: RequestStatus,
    ) -> Result<Request, RequestError> {
        let mut entry = self.requests.get_mut(&id).ok_or(RequestError::NotFound(id))?;
        if entry.status != expected {
            return Err(RequestError::ConflictingStatus {
                expected,
                found: entry.status,
            });
        }
        entry.status = new;
        entry.status_changed_at = Utc::now();
        Ok(entry.value().clone())
    }

    /// Remove a request, returning it.
    ///
    /// # Errors
    ///
    /// [`RequestError::NotFound`] if no such request exists.
    pub fn delete(&self, id: RequestId) -> Result<Request, RequestError> {
        self.requests
            .remove(&id)
            .map(|(_, request)| request)
            .ok_or(RequestError::NotFound(id))
    }

    /// Number of stored requests.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Whether the store holds no requests.
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    fn list_filtered(&self, accept: impl Fn(&Request) -> bool) -> Vec<Request> {
        let mut matches: Vec<Request> = self
            .requests
            .iter()
            .filter(|entry| accept(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        // Newest first; id breaks creation-time ties deterministically
        matches.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        matches
    }
}
