//! Order feed configuration.

use serde::Deserialize;

/// WebSocket reconnection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ReconnectionConfig {
    /// Initial delay before the first reconnection attempt (milliseconds).
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    /// Maximum delay between reconnection attempts (milliseconds).
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Multiplier applied to the delay after each attempt.
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
    /// Reconnects without a message before giving up. `0` means never.
    #[serde(default)]
    pub max_attempts: u32,
}

fn default_initial_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    30_000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

impl Default for ReconnectionConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            max_attempts: 0,
        }
    }
}

/// `[feed]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Start the stream ingestor with `serve`.
    #[serde(default)]
    pub enabled: bool,
    /// Broker WebSocket URL (`ws://` or `wss://`).
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_topic")]
    pub topic: String,
    #[serde(default = "default_group_id")]
    pub group_id: String,
    #[serde(default)]
    pub reconnection: ReconnectionConfig,
}

fn default_topic() -> String {
    "orders".into()
}

fn default_group_id() -> String {
    "orderbridge".into()
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: String::new(),
            topic: default_topic(),
            group_id: default_group_id(),
            reconnection: ReconnectionConfig::default(),
        }
    }
}
