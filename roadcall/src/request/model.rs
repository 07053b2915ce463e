//! Request entity and its value types.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::actor::{ActorRole, PartyId};
use crate::coord::Coordinate;

/// Identifier assigned to a request by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a request.
///
/// `Pending` is initial; `Rejected`, `Completed`, and `Cancelled` are
/// terminal. The reachable transitions are defined by
/// [`allowed_role`](super::allowed_role).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestStatus {
    /// Created, awaiting the provider's decision.
    Pending,
    /// Provider has committed to the job and is en route.
    Accepted,
    /// Provider declined the job.
    Rejected,
    /// Service delivered (explicitly or by proximity).
    Completed,
    /// Requester withdrew the job.
    Cancelled,
}

impl RequestStatus {
    /// Whether this status has no outgoing transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RequestStatus::Rejected | RequestStatus::Completed | RequestStatus::Cancelled
        )
    }

    /// Whether a request in this status is still in flight.
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Accepted => "accepted",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Completed => "completed",
            RequestStatus::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// What the requester needs help with.
///
/// A fixed closed set, with `Other` carrying free text for anything the
/// set doesn't cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCategory {
    Puncture,
    FuelProblem,
    EngineIssue,
    BrakeFailure,
    BatteryIssue,
    Other(String),
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceCategory::Puncture => f.write_str("Puncture"),
            ServiceCategory::FuelProblem => f.write_str("Fuel Problem"),
            ServiceCategory::EngineIssue => f.write_str("Engine Issue"),
            ServiceCategory::BrakeFailure => f.write_str("Brake Failure"),
            ServiceCategory::BatteryIssue => f.write_str("Battery Issue"),
            ServiceCategory::Other(text) => f.write_str(text),
        }
    }
}

/// A service request binding one requester to one provider.
///
/// `requester_coordinate` records where service was requested from and is
/// immutable after creation; the requester is assumed stationary while
/// awaiting service. `provider_coordinate` is the provider's position
/// snapshot at creation time only: the proximity watcher reads the live
/// value from the provider index instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// Store-assigned identifier.
    pub id: RequestId,
    /// The party that asked for service.
    pub requester: PartyId,
    /// The party expected to deliver it.
    pub provider: PartyId,
    /// Where the requester was at creation time. Immutable.
    pub requester_coordinate: Coordinate,
    /// Where the provider was at creation time. Snapshot only.
    pub provider_coordinate: Coordinate,
    /// Great-circle distance between the two creation positions, in meters.
    pub distance_meters: f64,
    /// Current lifecycle status.
    pub status: RequestStatus,
    /// Requested service category.
    pub category: ServiceCategory,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the most recent status change (creation counts).
    pub status_changed_at: DateTime<Utc>,
}

impl Request {
    /// The role under which `id` participates in this request, if any.
    pub fn role_of(&self, id: &PartyId) -> Option<ActorRole> {
        if *id == self.requester {
            Some(ActorRole::Requester)
        } else if *id == self.provider {
            Some(ActorRole::Provider)
        } else {
            None
        }
    }
}
