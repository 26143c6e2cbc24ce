//! Background cache warm-up and its readiness signal.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::application::cache::OrderCache;
use crate::port::OrderStore;

/// Progress of the startup preload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PreloadStatus {
    /// The store enumeration has not returned yet.
    Pending,
    /// The cache was warmed with `loaded` orders.
    Complete { loaded: usize },
    /// The enumeration failed. Misses are backfilled lazily by reads.
    Failed { reason: String },
}

impl PreloadStatus {
    /// True once preload has finished, successfully or not.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Spawn the preload task. The final status is published on `status`.
pub(super) fn spawn_preload(
    store: Arc<dyn OrderStore>,
    cache: Arc<OrderCache>,
    status: watch::Sender<PreloadStatus>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let started = Instant::now();
        let result = cache.preload(|| store.get_all_orders()).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let outcome = match result {
            Ok(loaded) => {
                info!(loaded, cached = cache.len(), elapsed_ms, "Order cache preloaded");
                PreloadStatus::Complete { loaded }
            }
            Err(e) => {
                warn!(
                    error = %e,
                    cached = cache.len(),
                    elapsed_ms,
                    "Order cache preload failed, continuing with lazy backfill"
                );
                PreloadStatus::Failed {
                    reason: e.to_string(),
                }
            }
        };
        status.send_replace(outcome);
    })
}
