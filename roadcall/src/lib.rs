//! Roadcall - service-request dispatch core for roadside assistance
//!
//! This library provides the lifecycle engine that matches a stranded
//! requester to a nearby service provider, tracks the request through a
//! strict state machine, and autonomously completes it when the provider's
//! live position closes to within the completion threshold.
//!
//! # High-Level API
//!
//! For most use cases, the [`service`] module provides a simplified facade:
//!
//! ```ignore
//! use roadcall::service::{DispatchService, ServiceConfig};
//!
//! let config = ServiceConfig::default();
//! let service = DispatchService::new(config);
//!
//! // Spawn the proximity watcher for autonomous completion
//! let token = tokio_util::sync::CancellationToken::new();
//! let handle = service.spawn_watcher(token.clone());
//! ```

pub mod actor;
pub mod coord;
pub mod events;
pub mod logging;
pub mod provider;
pub mod request;
pub mod service;
pub mod watcher;

/// Version of the roadcall library.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
