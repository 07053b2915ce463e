//! Lifecycle event broadcasting.
//!
//! The notification collaborator subscribes here to deliver "request
//! created" / "accepted" / "completed" signals to end users. Sends are
//! fire-and-forget from the core's perspective: no subscribers is not an
//! error, and delivery failures never flow back into the state machine.

use tokio::sync::broadcast;

use crate::request::Request;

/// What caused an `accepted -> completed` transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionTrigger {
    /// The provider explicitly marked the job done.
    Provider,
    /// The proximity watcher observed the parties within the completion
    /// threshold.
    Proximity,
}

/// A lifecycle event carrying the request as of the moment it fired.
#[derive(Debug, Clone)]
pub enum RequestEvent {
    /// A new request entered the system in `pending` status.
    Created(Request),
    /// The provider committed to the job.
    Accepted(Request),
    /// The provider declined the job.
    Rejected(Request),
    /// The requester withdrew the job.
    Cancelled(Request),
    /// The job reached `completed`, exactly once per request.
    Completed {
        request: Request,
        trigger: CompletionTrigger,
    },
}

/// Broadcast channel for lifecycle events.
#[derive(Debug, Clone)]
pub struct RequestEvents {
    tx: broadcast::Sender<RequestEvent>,
}

impl RequestEvents {
    /// Create an event channel with the given buffer capacity.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<RequestEvent> {
        self.tx.subscribe()
    }

    /// Publish an event (ignore errors - no subscribers is OK).
    pub fn publish(&self, event: RequestEvent) {
        let _ = self.tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::PartyId;
    use crate::coord::Coordinate;
    use crate::request::{RequestId, RequestStatus, ServiceCategory};
    use chrono::Utc;

    fn make_request() -> Request {
        let now = Utc::now();
        Request {
            id: RequestId(1),
            requester: PartyId::new("u1"),
            provider: PartyId::new("m1"),
            requester_coordinate: Coordinate::new(12.9716, 77.5946).unwrap(),
            provider_coordinate: Coordinate::new(12.9760, 77.5990).unwrap(),
            distance_meters: 680.0,
            status: RequestStatus::Pending,
            category: ServiceCategory::Puncture,
            created_at: now,
            status_changed_at: now,
        }
    }

    #[test]
    fn test_publish_without_subscribers_is_ok() {
        let events = RequestEvents::new(16);
        events.publish(RequestEvent::Created(make_request()));
    }

    #[test]
    fn test_subscriber_receives_events() {
        let events = RequestEvents::new(16);
        let mut rx = events.subscribe();

        events.publish(RequestEvent::Completed {
            request: make_request(),
            trigger: CompletionTrigger::Proximity,
        });

        match rx.try_recv().unwrap() {
            RequestEvent::Completed { trigger, .. } => {
                assert_eq!(trigger, CompletionTrigger::Proximity);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_late_subscriber_misses_earlier_events() {
        let events = RequestEvents::new(16);
        events.publish(RequestEvent::Created(make_request()));

        // Broadcast semantics: only events after subscription are seen
        let mut rx = events.subscribe();
        assert!(rx.try_recv().is_err());
    }
}
