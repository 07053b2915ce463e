//! Provider records and the nearby-provider index.
//!
//! The [`ProviderIndex`] is the in-memory geospatial store for provider
//! records: each provider owns exactly one record (current coordinate,
//! availability flag, capability tags) and mutates it only through the
//! index's explicit entry points. Everything else in the core only reads.
//!
//! # Thread Safety
//!
//! Records live in a `DashMap` (concurrent reads, per-shard write locks).
//! A provider's location update and a concurrent watcher read never block
//! unrelated providers.

mod index;
mod record;

pub use index::ProviderIndex;
pub use record::ProviderRecord;
