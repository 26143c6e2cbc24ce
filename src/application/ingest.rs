//! Stream ingestion: feed messages in, write-through saves out.
//!
//! Each message carries one JSON order document. Malformed documents and
//! failed saves are logged and counted; neither stops the loop, and nothing is
//! retried here. Redelivery is the transport's business.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::application::order::OrderService;
use crate::domain::Order;
use crate::error::Result;
use crate::port::{FeedMessage, MessageFeed};

/// Counters for one ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    /// Messages pulled from the feed.
    pub received: u64,
    /// Orders persisted and cached.
    pub saved: u64,
    /// Messages dropped because they did not decode into a valid order.
    pub decode_failures: u64,
    /// Orders that decoded but could not be saved.
    pub save_failures: u64,
}

/// What happened to a single message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    Saved,
    DecodeFailed,
    SaveFailed,
}

/// Consumes a [`MessageFeed`] and forwards decoded orders to
/// [`OrderService::save_order`].
pub struct StreamIngestor {
    feed: Box<dyn MessageFeed>,
    service: Arc<OrderService>,
    stats: IngestStats,
}

impl StreamIngestor {
    #[must_use]
    pub fn new(feed: Box<dyn MessageFeed>, service: Arc<OrderService>) -> Self {
        Self {
            feed,
            service,
            stats: IngestStats::default(),
        }
    }

    /// Counters accumulated so far.
    #[must_use]
    pub fn stats(&self) -> IngestStats {
        self.stats
    }

    /// Run until the feed closes or `shutdown` flips to `true`.
    ///
    /// Shutdown is observed between messages: the loop stops pulling as soon
    /// as the signal fires, but a save already in progress runs to completion
    /// first. A dropped shutdown sender is treated as a shutdown request.
    ///
    /// # Errors
    ///
    /// Returns an error only if the initial feed connection fails.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> Result<IngestStats> {
        self.feed.connect().await?;
        info!(feed = self.feed.name(), "Stream ingestion started");

        loop {
            if *shutdown.borrow_and_update() {
                info!("Shutdown requested, stopping stream ingestion");
                break;
            }

            let message = tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        info!("Shutdown channel closed, stopping stream ingestion");
                        break;
                    }
                    continue;
                }
                message = self.feed.next_message() => message,
            };

            let Some(message) = message else {
                info!(feed = self.feed.name(), "Feed closed");
                break;
            };

            self.handle(message).await;
        }

        info!(
            received = self.stats.received,
            saved = self.stats.saved,
            decode_failures = self.stats.decode_failures,
            save_failures = self.stats.save_failures,
            "Stream ingestion stopped"
        );
        Ok(self.stats)
    }

    /// Decode and save one message, updating the counters.
    pub async fn handle(&mut self, message: FeedMessage) -> IngestOutcome {
        self.stats.received += 1;

        let order = match Order::from_json(&message.payload) {
            Ok(order) => order,
            Err(e) => {
                self.stats.decode_failures += 1;
                warn!(
                    sequence = message.sequence,
                    bytes = message.payload.len(),
                    error = %e,
                    "Dropping undecodable message"
                );
                return IngestOutcome::DecodeFailed;
            }
        };

        match self.service.save_order(&order).await {
            Ok(()) => {
                self.stats.saved += 1;
                debug!(
                    sequence = message.sequence,
                    order_uid = %order.order_uid,
                    "Processed order"
                );
                IngestOutcome::Saved
            }
            Err(e) => {
                self.stats.save_failures += 1;
                warn!(
                    sequence = message.sequence,
                    order_uid = %order.order_uid,
                    error = %e,
                    "Failed to save order"
                );
                IngestOutcome::SaveFailed
            }
        }
    }
}
