//! Service facade for the dispatch core.
//!
//! [`DispatchService`] wires the provider index, request store, lifecycle
//! rules, and event channel together behind the operations callers use:
//! provider upserts, nearby search, request creation, status transitions,
//! listings, deletion, and the proximity watcher spawn.

mod config;
mod error;
mod facade;

pub use config::{ServiceConfig, ServiceConfigBuilder, DEFAULT_SEARCH_RADIUS_M};
pub use error::ServiceError;
pub use facade::DispatchService;
