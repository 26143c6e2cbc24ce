//! Mock [`MessageFeed`] implementations for testing.
//!
//! - [`ScriptedFeed`] - Pre-loaded connect results and payloads.
//!   Best for: decode/save handling, reconnection logic.
//!
//! - [`ChannelFeed`] - Channel-backed feed with an external sender.
//!   Best for: shutdown and timing tests needing on-demand delivery.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::Result;
use crate::port::{FeedMessage, MessageFeed};

// ---------------------------------------------------------------------------
// ScriptedFeed
// ---------------------------------------------------------------------------

/// A feed with scripted connect results and a fixed message queue.
///
/// Each `connect()` pops the next result (defaults to `Ok(())` when
/// exhausted). Once the queue is drained the feed reports closed, unless
/// [`hold_open`](Self::hold_open) was set, in which case it waits forever.
#[derive(Default)]
pub struct ScriptedFeed {
    connect_results: VecDeque<Result<()>>,
    messages: VecDeque<FeedMessage>,
    hold_open: bool,
    sequence: u64,
    connect_count: Arc<AtomicU32>,
}

impl ScriptedFeed {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_connect_results(mut self, results: Vec<Result<()>>) -> Self {
        self.connect_results = results.into();
        self
    }

    #[must_use]
    pub fn with_payloads<P: Into<Vec<u8>>>(mut self, payloads: impl IntoIterator<Item = P>) -> Self {
        for payload in payloads {
            self.sequence += 1;
            self.messages.push_back(FeedMessage::new(self.sequence, payload));
        }
        self
    }

    /// Keep the feed open after the queue drains.
    #[must_use]
    pub fn hold_open(mut self) -> Self {
        self.hold_open = true;
        self
    }

    /// Shared counter of `connect()` calls.
    #[must_use]
    pub fn connect_count(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.connect_count)
    }
}

#[async_trait]
impl MessageFeed for ScriptedFeed {
    async fn connect(&mut self) -> Result<()> {
        self.connect_count.fetch_add(1, Ordering::SeqCst);
        self.connect_results.pop_front().unwrap_or(Ok(()))
    }

    async fn next_message(&mut self) -> Option<FeedMessage> {
        if let Some(message) = self.messages.pop_front() {
            return Some(message);
        }
        if self.hold_open {
            std::future::pending::<()>().await;
        }
        None
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

// ---------------------------------------------------------------------------
// ChannelFeed
// ---------------------------------------------------------------------------

/// A feed driven by an mpsc channel. Closes when every sender is dropped.
pub struct ChannelFeed {
    rx: mpsc::UnboundedReceiver<Vec<u8>>,
    sequence: u64,
}

impl ChannelFeed {
    /// Create the feed and the sender that drives it.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedSender<Vec<u8>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { rx, sequence: 0 }, tx)
    }
}

#[async_trait]
impl MessageFeed for ChannelFeed {
    async fn connect(&mut self) -> Result<()> {
        Ok(())
    }

    async fn next_message(&mut self) -> Option<FeedMessage> {
        let payload = self.rx.recv().await?;
        self.sequence += 1;
        Some(FeedMessage::new(self.sequence, payload))
    }

    fn name(&self) -> &'static str {
        "channel"
    }
}
