//! Service-request entities, storage, and the lifecycle state machine.
//!
//! A [`Request`] walks a strict state graph from `pending` to one of three
//! terminal states. Every status change goes through
//! [`RequestStore::compare_and_set_status`], the single per-request
//! serialization point: an explicit actor action and the proximity watcher's
//! autonomous completion can race, and exactly one of them wins.

mod error;
mod lifecycle;
mod model;
mod store;

pub use error::RequestError;
pub use lifecycle::{allowed_role, authorize_delete, authorize_transition};
pub use model::{Request, RequestId, RequestStatus, ServiceCategory};
pub use store::RequestStore;
