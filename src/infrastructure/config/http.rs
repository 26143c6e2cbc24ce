//! HTTP API configuration.

use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;

/// `[http]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Listen address.
    #[serde(default = "default_address")]
    pub address: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Directory served under `/` and `/static`.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

fn default_address() -> String {
    "127.0.0.1:8080".into()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_static_dir() -> String {
    "static".into()
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            timeout_secs: default_timeout_secs(),
            static_dir: default_static_dir(),
        }
    }
}

impl HttpConfig {
    /// Parsed listen address, if valid.
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.address.parse()
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
