//! Service configuration types.

use crate::watcher::ProximityWatcherConfig;

/// Default search radius for nearby-provider queries, in meters.
pub const DEFAULT_SEARCH_RADIUS_M: f64 = 20_000.0;

/// Default buffer capacity for the lifecycle event channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Configuration for the dispatch service.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use roadcall::service::ServiceConfig;
/// use roadcall::watcher::ProximityWatcherConfig;
///
/// let config = ServiceConfig::builder()
///     .search_radius_m(5_000.0)
///     .watcher(ProximityWatcherConfig {
///         eval_interval: Duration::from_secs(2),
///         ..Default::default()
///     })
///     .build();
///
/// assert_eq!(config.search_radius_m(), 5_000.0);
/// ```
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Radius used when a nearby query doesn't supply one
    search_radius_m: f64,
    /// Proximity watcher configuration
    watcher: ProximityWatcherConfig,
    /// Lifecycle event channel capacity
    event_capacity: usize,
}

impl ServiceConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::default()
    }

    /// Get the default nearby-search radius in meters.
    pub fn search_radius_m(&self) -> f64 {
        self.search_radius_m
    }

    /// Get the proximity watcher configuration.
    pub fn watcher(&self) -> &ProximityWatcherConfig {
        &self.watcher
    }

    /// Get the lifecycle event channel capacity.
    pub fn event_capacity(&self) -> usize {
        self.event_capacity
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            search_radius_m: DEFAULT_SEARCH_RADIUS_M,
            watcher: ProximityWatcherConfig::default(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

/// Builder for ServiceConfig.
#[derive(Debug, Clone, Default)]
pub struct ServiceConfigBuilder {
    search_radius_m: Option<f64>,
    watcher: Option<ProximityWatcherConfig>,
    event_capacity: Option<usize>,
}

impl ServiceConfigBuilder {
    /// Set the default nearby-search radius in meters.
    pub fn search_radius_m(mut self, radius: f64) -> Self {
        self.search_radius_m = Some(radius);
        self
    }

    /// Set the proximity watcher configuration.
    pub fn watcher(mut self, config: ProximityWatcherConfig) -> Self {
        self.watcher = Some(config);
        self
    }

    /// Set the lifecycle event channel capacity.
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = Some(capacity);
        self
    }

    /// Build the configuration with defaults for unset values.
    pub fn build(self) -> ServiceConfig {
        ServiceConfig {
            search_radius_m: self.search_radius_m.unwrap_or(DEFAULT_SEARCH_RADIUS_M),
            watcher: self.watcher.unwrap_or_default(),
            event_capacity: self.event_capacity.unwrap_or(DEFAULT_EVENT_CAPACITY),
        }
    }
}
