//! Service error types.

use thiserror::Error;

use crate::actor::PartyId;
use crate::coord::CoordError;
use crate::request::{RequestError, RequestId, RequestStatus};

/// Errors returned to calling actors by [`DispatchService`](super::DispatchService).
///
/// All variants are per-operation, typed failures so that UI layers can
/// render specific messages; none is fatal to the process.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    /// Malformed latitude/longitude input.
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(#[from] CoordError),

    /// Unknown request id.
    #[error("Request {0} not found")]
    RequestNotFound(RequestId),

    /// Unknown provider id.
    #[error("Provider {0} not found")]
    ProviderNotFound(PartyId),

    /// Actor not permitted for this transition or deletion.
    #[error("Actor {actor} is not authorized for this operation")]
    Unauthorized { actor: PartyId },

    /// Target status unreachable from the current status for any actor.
    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition {
        from: RequestStatus,
        to: RequestStatus,
    },

    /// Optimistic concurrency failure: someone else changed the status
    /// first. Recoverable by re-reading and deciding whether to retry.
    #[error("Status changed concurrently (expected {expected}, found {found})")]
    ConflictingStatus {
        expected: RequestStatus,
        found: RequestStatus,
    },
}

impl From<RequestError> for ServiceError {
    fn from(e: RequestError) -> Self {
        match e {
            RequestError::NotFound(id) => Self::RequestNotFound(id),
            RequestError::Unauthorized { actor } => Self::Unauthorized { actor },
            RequestError::InvalidTransition { from, to } => Self::InvalidTransition { from, to },
            RequestError::ConflictingStatus { expected, found } => {
                Self::ConflictingStatus { expected, found }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_coord_error() {
        let err: ServiceError = CoordError::InvalidLatitude(95.0).into();
        assert!(matches!(err, ServiceError::InvalidCoordinate(_)));
        assert!(err.to_string().contains("95"));
    }

    #[test]
    fn test_from_request_error() {
        let err: ServiceError = RequestError::NotFound(RequestId(3)).into();
        assert_eq!(err, ServiceError::RequestNotFound(RequestId(3)));

        let err: ServiceError = RequestError::ConflictingStatus {
            expected: RequestStatus::Pending,
            found: RequestStatus::Cancelled,
        }
        .into();
        assert!(matches!(err, ServiceError::ConflictingStatus { .. }));
    }

    #[test]
    fn test_display_provider_not_found() {
        let err = ServiceError::ProviderNotFound(PartyId::new("m9"));
        assert!(err.to_string().contains("m9"));
    }
}
