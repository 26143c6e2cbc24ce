//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file; `ORDERBRIDGE_DATABASE` overrides
//! the database path.
//!
//! # Example
//!
//! ```no_run
//! use orderbridge::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use super::feed::FeedConfig;
use super::http::HttpConfig;
use super::logging::LoggingConfig;
use crate::error::{ConfigError, Result};

/// Environment variable overriding [`Config::database`].
pub const DATABASE_ENV: &str = "ORDERBRIDGE_DATABASE";

/// Deployment environment. Selects logging defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Dev,
    Prod,
}

/// Main application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub env: Environment,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Path to SQLite database file.
    ///
    /// Defaults to "orderbridge.db" in the current directory.
    #[serde(default = "default_database_path")]
    pub database: String,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub feed: FeedConfig,
}

fn default_database_path() -> String {
    "orderbridge.db".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            env: Environment::default(),
            logging: LoggingConfig::default(),
            database: default_database_path(),
            http: HttpConfig::default(),
            feed: FeedConfig::default(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML content, applying process environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        Self::parse_toml_with_env(content, |key| std::env::var(key).ok())
    }

    /// Parse configuration from TOML content with an explicit environment
    /// lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    pub fn parse_toml_with_env<F>(content: &str, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        if let Some(database) = env(DATABASE_ENV) {
            config.database = database;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule as a [`ConfigError`].
    pub fn validate(&self) -> Result<()> {
        if self.database.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "database" }.into());
        }

        if let Err(e) = self.http.socket_addr() {
            return Err(ConfigError::InvalidValue {
                field: "http.address",
                reason: e.to_string(),
            }
            .into());
        }
        if self.http.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "http.timeout_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if self.feed.enabled {
            if self.feed.url.trim().is_empty() {
                return Err(ConfigError::MissingField { field: "feed.url" }.into());
            }
            match url::Url::parse(&self.feed.url) {
                Ok(url) if matches!(url.scheme(), "ws" | "wss") => {}
                Ok(url) => {
                    return Err(ConfigError::InvalidValue {
                        field: "feed.url",
                        reason: format!("unsupported scheme {}", url.scheme()),
                    }
                    .into());
                }
                Err(e) => {
                    return Err(ConfigError::InvalidValue {
                        field: "feed.url",
                        reason: e.to_string(),
                    }
                    .into());
                }
            }
            if self.feed.topic.trim().is_empty() {
                return Err(ConfigError::MissingField { field: "feed.topic" }.into());
            }
        }

        let reconnection = &self.feed.reconnection;
        if reconnection.initial_delay_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "initial_delay_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if reconnection.max_delay_ms < reconnection.initial_delay_ms {
            return Err(ConfigError::InvalidValue {
                field: "max_delay_ms",
                reason: "must be >= initial_delay_ms".to_string(),
            }
            .into());
        }
        if reconnection.backoff_multiplier < 1.0 {
            return Err(ConfigError::InvalidValue {
                field: "backoff_multiplier",
                reason: "must be >= 1.0".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init(self.env);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::parse_toml_with_env("", no_env).unwrap();
        assert_eq!(config.env, Environment::Local);
        assert_eq!(config.database, "orderbridge.db");
        assert_eq!(config.http.address, "127.0.0.1:8080");
        assert!(!config.feed.enabled);
        assert_eq!(config.feed.topic, "orders");
        assert_eq!(config.feed.reconnection.initial_delay_ms, 500);
    }

    #[test]
    fn database_env_overrides_file() {
        let config = Config::parse_toml_with_env(r#"database = "file.db""#, |key| {
            (key == DATABASE_ENV).then(|| "env.db".to_string())
        })
        .unwrap();
        assert_eq!(config.database, "env.db");
    }

    #[test]
    fn enabled_feed_requires_url() {
        let result = Config::parse_toml_with_env("[feed]\nenabled = true\n", no_env);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::MissingField { field: "feed.url" }))
        ));
    }

    #[test]
    fn feed_url_must_be_websocket() {
        let toml = "[feed]\nenabled = true\nurl = \"http://broker:9000\"\n";
        let result = Config::parse_toml_with_env(toml, no_env);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue { field: "feed.url", .. }))
        ));
    }

    #[test]
    fn disabled_feed_ignores_url() {
        let config = Config::parse_toml_with_env("[feed]\nurl = \"\"\n", no_env).unwrap();
        assert!(!config.feed.enabled);
    }

    #[test]
    fn environment_parses_lowercase() {
        let config = Config::parse_toml_with_env(r#"env = "prod""#, no_env).unwrap();
        assert_eq!(config.env, Environment::Prod);
    }
}
