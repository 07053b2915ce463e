//! Proximity watcher - autonomous completion daemon.
//!
//! On a fixed evaluation interval, walks every request in `accepted`
//! status, recomputes the distance between the provider's live position
//! and the requester's creation-time position, and drives the request to
//! `completed` once they close to within the threshold.
//!
//! # Design
//!
//! Follows the daemon pattern used elsewhere in the workspace:
//! - `new()` + `start()` spawns the async task
//! - `run()` loop with `tokio::time::interval`
//! - Cancellation-token shutdown, checked first in a biased select
//!
//! The watcher holds no state of its own between ticks. Its only write is
//! the per-request compare-and-set, so shutdown mid-cycle cannot leave a
//! request inconsistent. A lost race against an explicit actor action
//! surfaces as `ConflictingStatus` and is expected, not an error.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::coord::distance_meters;
use crate::events::{CompletionTrigger, RequestEvent, RequestEvents};
use crate::provider::ProviderIndex;
use crate::request::{Request, RequestError, RequestStatus, RequestStore};

/// Default evaluation interval.
pub const DEFAULT_EVAL_INTERVAL: Duration = Duration::from_secs(5);

/// Default completion threshold in meters.
pub const DEFAULT_COMPLETION_THRESHOLD_M: f64 = 50.0;

/// Configuration for the proximity watcher.
#[derive(Debug, Clone)]
pub struct ProximityWatcherConfig {
    /// Interval between evaluation cycles.
    ///
    /// Every accepted request is evaluated once per cycle.
    /// Default: 5s
    pub eval_interval: Duration,

    /// Distance at or below which an accepted request completes.
    ///
    /// Default: 50m
    pub completion_threshold_m: f64,
}

impl Default for ProximityWatcherConfig {
    fn default() -> Self {
        Self {
            eval_interval: DEFAULT_EVAL_INTERVAL,
            completion_threshold_m: DEFAULT_COMPLETION_THRESHOLD_M,
        }
    }
}

/// Background task that completes accepted requests by proximity.
pub struct ProximityWatcher {
    /// Request storage, shared with the service facade.
    store: Arc<RequestStore>,

    /// Provider index, read for live coordinates.
    providers: Arc<ProviderIndex>,

    /// Lifecycle event channel.
    events: RequestEvents,

    /// Configuration.
    config: ProximityWatcherConfig,
}

impl ProximityWatcher {
    /// Create a new watcher over the given store and index.
    pub fn new(
        store: Arc<RequestStore>,
        providers: Arc<ProviderIndex>,
        events: RequestEvents,
        config: ProximityWatcherConfig,
    ) -> Self {
        Self {
            store,
            providers,
            events,
            config,
        }
    }

    /// Start the watcher as an async task.
    ///
    /// The task runs until `token` is cancelled.
    pub fn start(self, token: CancellationToken) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            self.run(token).await;
        })
    }

    /// Run the evaluation loop.
    async fn run(self, token: CancellationToken) {
        info!(
            eval_interval_ms = self.config.eval_interval.as_millis(),
            completion_threshold_m = self.config.completion_threshold_m,
            "Proximity watcher started"
        );

        let mut interval = tokio::time::interval(self.config.eval_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;

                _ = token.cancelled() => {
                    info!("Proximity watcher shutting down");
                    break;
                }

                _ = interval.tick() => {
                    self.evaluate_cycle();
                }
            }
        }
    }

    /// Evaluate every accepted request once.
    ///
    /// A failure evaluating one request never blocks or aborts the others.
    fn evaluate_cycle(&self) {
        let accepted = self.store.list_by_status(RequestStatus::Accepted);
        if accepted.is_empty() {
            return;
        }

        trace!(count = accepted.len(), "Evaluating accepted requests");

        for request in accepted {
            self.evaluate_request(&request);
        }
    }

    /// Evaluate a single accepted request, completing it if close enough.
    fn evaluate_request(&self, request: &Request) {
        // Live provider position; the snapshot on the request is only the
        // creation-time value.
        let Some(record) = self.providers.get(&request.provider) else {
            warn!(
                request_id = %request.id,
                provider = %request.provider,
                "Provider record unresolvable, skipping until next cycle"
            );
            return;
        };

        let distance = distance_meters(&record.coordinate, &request.requester_coordinate);
        trace!(
            request_id = %request.id,
            distance_m = format!("{:.1}", distance),
            "Proximity check"
        );

        if distance > self.config.completion_threshold_m {
            return;
        }

        match self.store.compare_and_set_status(
            request.id,
            RequestStatus::Accepted,
            RequestStatus::Completed,
        ) {
            Ok(updated) => {
                info!(
                    request_id = %updated.id,
                    distance_m = format!("{:.1}", distance),
                    "Request completed by proximity"
                );
                self.events.publish(RequestEvent::Completed {
                    request: updated,
                    trigger: CompletionTrigger::Proximity,
                });
            }
            Err(RequestError::ConflictingStatus { found, .. }) => {
                // An explicit action won the race; nothing to do
                debug!(
                    request_id = %request.id,
                    found = %found,
                    "Request left accepted before proximity completion"
                );
            }
            Err(RequestError::NotFound(_)) => {
                // Deleted between listing and CAS
                debug!(request_id = %request.id, "Request deleted mid-cycle");
            }
            Err(e) => {
                warn!(request_id = %request.id, error = %e, "Proximity completion failed");
            }
        }
    }
}
