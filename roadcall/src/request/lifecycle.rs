//! Request lifecycle state machine.
//!
//! The transition table below is the complete set of legal status changes
//! and the role required to trigger each one. The proximity watcher's
//! autonomous `accepted -> completed` trigger bypasses actor authorization
//! and goes straight to the store's compare-and-set; everything an actor
//! does flows through [`authorize_transition`] first.
//!
//! | From     | To        | Allowed actor |
//! |----------|-----------|---------------|
//! | pending  | accepted  | provider      |
//! | pending  | rejected  | provider      |
//! | pending  | cancelled | requester     |
//! | accepted | completed | provider      |
//! | accepted | cancelled | requester     |

use super::error::RequestError;
use super::model::{Request, RequestStatus};
use crate::actor::{Actor, ActorRole};

/// The role allowed to trigger the `from -> to` transition, if the
/// transition exists at all.
pub fn allowed_role(from: RequestStatus, to: RequestStatus) -> Option<ActorRole> {
    use RequestStatus::*;
    match (from, to) {
        (Pending, Accepted) => Some(ActorRole::Provider),
        (Pending, Rejected) => Some(ActorRole::Provider),
        (Pending, Cancelled) => Some(ActorRole::Requester),
        (Accepted, Completed) => Some(ActorRole::Provider),
        (Accepted, Cancelled) => Some(ActorRole::Requester),
        _ => None,
    }
}

/// Authorize an explicit transition attempt by `actor`.
///
/// On success, returns the status observed at authorization time; the
/// caller must pass it as the expected value to
/// [`RequestStore::compare_and_set_status`](super::RequestStore::compare_and_set_status)
/// so that a concurrent change between authorization and write surfaces as
/// [`RequestError::ConflictingStatus`] instead of a silent overwrite.
///
/// # Errors
///
/// - [`RequestError::Unauthorized`] if the actor is not a party to the
///   request under its declared role, or is the wrong party for this
///   transition.
/// - [`RequestError::InvalidTransition`] if no actor may move the request
///   from its current status to `target` (including any attempt to leave a
///   terminal status).
pub fn authorize_transition(
    request: &Request,
    actor: &Actor,
    target: RequestStatus,
) -> Result<RequestStatus, RequestError> {
    let relation = party_role(request, actor)?;

    let from = request.status;
    match allowed_role(from, target) {
        None => Err(RequestError::InvalidTransition { from, to: target }),
        Some(required) if required == relation => Ok(from),
        Some(_) => Err(RequestError::Unauthorized {
            actor: actor.id.clone(),
        }),
    }
}

/// Authorize deletion of a request by `actor`.
///
/// Either party may delete its own request, in any state; nobody else may.
/// Deletion is out-of-band with respect to the state machine.
pub fn authorize_delete(request: &Request, actor: &Actor) -> Result<(), RequestError> {
    party_role(request, actor).map(|_| ())
}

/// The role `actor` holds on this request, verified against both the
/// declared role and the stored identity. A stranger, or a party claiming
/// the wrong role, is rejected before any transition-validity check runs.
fn party_role(request: &Request, actor: &Actor) -> Result<ActorRole, RequestError> {
    match request.role_of(&actor.id) {
        Some(role) if role == actor.role => Ok(role),
        _ => Err(RequestError::Unauthorized {
            actor: actor.id.clone(),
        }),
    }
}
