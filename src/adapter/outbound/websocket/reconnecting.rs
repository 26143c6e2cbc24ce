//! Reconnecting wrapper for any [`MessageFeed`].
//!
//! When the inner feed fails to connect or ends a session, the wrapper waits
//! with exponential backoff and reconnects instead of reporting the feed as
//! closed. It gives up
//! only after `max_attempts` reconnects in a row without a single message
//! (`0` retries forever).

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::error::Result;
use crate::infrastructure::config::feed::ReconnectionConfig;
use crate::port::{FeedMessage, MessageFeed};

/// Wrapper that adds automatic reconnection to any [`MessageFeed`].
pub struct ReconnectingFeed<F: MessageFeed> {
    inner: F,
    config: ReconnectionConfig,
    /// Reconnects since the last delivered message.
    attempts: u32,
    current_delay_ms: u64,
    connected: bool,
}

impl<F: MessageFeed> ReconnectingFeed<F> {
    /// Wrap `inner`. Call [`connect`](MessageFeed::connect) before reading.
    pub fn new(inner: F, config: ReconnectionConfig) -> Self {
        let initial_delay = config.initial_delay_ms;
        Self {
            inner,
            config,
            attempts: 0,
            current_delay_ms: initial_delay,
            connected: false,
        }
    }

    fn reset_backoff(&mut self) {
        self.attempts = 0;
        self.current_delay_ms = self.config.initial_delay_ms;
    }

    fn exhausted(&self) -> bool {
        self.config.max_attempts != 0 && self.attempts >= self.config.max_attempts
    }

    /// Current delay plus jitter; advances the delay for the next call.
    fn next_delay(&mut self) -> Duration {
        let base_delay = Duration::from_millis(self.current_delay_ms);
        let delay = base_delay + Duration::from_millis(Self::jitter_ms(base_delay));

        let next_delay = (self.current_delay_ms as f64 * self.config.backoff_multiplier) as u64;
        self.current_delay_ms = next_delay.min(self.config.max_delay_ms);

        delay
    }

    /// Up to 20% of the base delay.
    fn jitter_ms(base_delay: Duration) -> u64 {
        let jitter_range_ms = (base_delay.as_millis() as u64) / 5;
        if jitter_range_ms == 0 {
            return 0;
        }

        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or(0);
        u64::from(nanos) % (jitter_range_ms + 1)
    }

    async fn reconnect(&mut self) -> Result<()> {
        self.attempts += 1;
        let delay = self.next_delay();
        info!(
            feed = self.inner.name(),
            delay_ms = delay.as_millis() as u64,
            attempt = self.attempts,
            "Reconnecting after delay"
        );
        sleep(delay).await;

        match self.inner.connect().await {
            Ok(()) => {
                info!(feed = self.inner.name(), "Reconnected");
                self.connected = true;
                Ok(())
            }
            Err(e) => {
                error!(feed = self.inner.name(), error = %e, "Reconnection failed");
                Err(e)
            }
        }
    }
}

#[async_trait]
impl<F: MessageFeed> MessageFeed for ReconnectingFeed<F> {
    /// Connect the inner feed. A failure is not returned: it is logged and
    /// retried with backoff by the next call to `next_message`.
    async fn connect(&mut self) -> Result<()> {
        self.reset_backoff();
        match self.inner.connect().await {
            Ok(()) => self.connected = true,
            Err(e) => {
                warn!(feed = self.inner.name(), error = %e, "Initial connect failed, will retry");
                self.connected = false;
            }
        }
        Ok(())
    }

    async fn next_message(&mut self) -> Option<FeedMessage> {
        loop {
            if !self.connected {
                if self.exhausted() {
                    error!(
                        feed = self.inner.name(),
                        attempts = self.attempts,
                        "Giving up on feed after repeated reconnects"
                    );
                    return None;
                }
                if let Err(e) = self.reconnect().await {
                    warn!(error = %e, "Reconnection attempt failed, will retry");
                    continue;
                }
            }

            match self.inner.next_message().await {
                Some(message) => {
                    if self.attempts > 0 {
                        debug!("Message received after reconnect, resetting backoff");
                        self.reset_backoff();
                    }
                    return Some(message);
                }
                None => {
                    warn!(feed = self.inner.name(), "Feed session ended, will reconnect");
                    self.connected = false;
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
