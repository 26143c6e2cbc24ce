//! Message transport port for inbound order documents.

use async_trait::async_trait;

use crate::error::Result;

/// A single undecoded message pulled from the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedMessage {
    /// Position of the message in this consumer's session, starting at 1.
    pub sequence: u64,
    /// Raw message body, expected to be one JSON order document.
    pub payload: Vec<u8>,
}

impl FeedMessage {
    #[must_use]
    pub fn new(sequence: u64, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            sequence,
            payload: payload.into(),
        }
    }
}

/// Source of inbound order messages.
///
/// Delivery is at-least-once: the same payload may arrive more than once and
/// consumers rely on idempotent upserts to absorb duplicates.
#[async_trait]
pub trait MessageFeed: Send {
    /// Establish the transport session.
    async fn connect(&mut self) -> Result<()>;

    /// Wait for the next message. Returns `None` once the feed is closed.
    ///
    /// Must be cancel-safe: a caller may drop the future when shutting down.
    async fn next_message(&mut self) -> Option<FeedMessage>;

    /// Short transport name for logs.
    fn name(&self) -> &'static str;
}

#[async_trait]
impl<F: MessageFeed + ?Sized> MessageFeed for Box<F> {
    async fn connect(&mut self) -> Result<()> {
        (**self).connect().await
    }

    async fn next_message(&mut self) -> Option<FeedMessage> {
        (**self).next_message().await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
