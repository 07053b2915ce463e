//! Error types for request storage and lifecycle operations.

use thiserror::Error;

use super::model::{RequestId, RequestStatus};
use crate::actor::PartyId;

/// Errors that can occur when reading or transitioning a request.
///
/// Every variant is a per-operation failure surfaced to the calling actor;
/// none is fatal to the process.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    /// No request with this id exists.
    #[error("Request {0} not found")]
    NotFound(RequestId),

    /// The acting identity is not permitted to perform this operation.
    #[error("Actor {actor} is not authorized for this operation")]
    Unauthorized {
        /// The identity that was rejected.
        actor: PartyId,
    },

    /// The target status is unreachable from the current status for any
    /// actor. Also covers any attempt to leave a terminal state.
    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition {
        /// Status at the time of the attempt.
        from: RequestStatus,
        /// Requested target status.
        to: RequestStatus,
    },

    /// Optimistic concurrency failure: the stored status no longer matches
    /// what the caller observed. Recoverable by re-reading and deciding
    /// whether to retry.
    #[error("Status changed concurrently (expected {expected}, found {found})")]
    ConflictingStatus {
        /// The status the caller expected to still hold.
        expected: RequestStatus,
        /// The status actually stored at the moment of update.
        found: RequestStatus,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_not_found() {
        let err = RequestError::NotFound(RequestId(42));
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn test_display_invalid_transition() {
        let err = RequestError::InvalidTransition {
            from: RequestStatus::Completed,
            to: RequestStatus::Accepted,
        };
        let rendered = err.to_string();
        assert!(rendered.contains("completed"));
        assert!(rendered.contains("accepted"));
    }

    #[test]
    fn test_display_conflicting_status() {
        let err = RequestError::ConflictingStatus {
            expected: RequestStatus::Pending,
            found: RequestStatus::Cancelled,
        };
        let rendered = err.to_string();
        assert!(rendered.contains("pending"));
        assert!(rendered.contains("cancelled"));
    }
}
