//! Logging configuration and initialization.
//!
//! The deployment [`Environment`] picks the defaults; `[logging]` entries
//! override them, and `RUST_LOG` overrides both.

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use super::settings::Environment;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub format: Option<LogFormat>,
}

impl LoggingConfig {
    /// Effective level and format for `env`.
    #[must_use]
    pub fn resolve(&self, env: Environment) -> (String, LogFormat) {
        let (level, format) = match env {
            Environment::Local => ("debug", LogFormat::Pretty),
            Environment::Dev => ("debug", LogFormat::Json),
            Environment::Prod => ("info", LogFormat::Json),
        };
        (
            self.level.clone().unwrap_or_else(|| level.to_string()),
            self.format.unwrap_or(format),
        )
    }

    /// Initialize the tracing subscriber with this logging configuration.
    pub fn init(&self, env: Environment) {
        let (level, format) = self.resolve(env);
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));

        match format {
            LogFormat::Json => {
                fmt().json().with_env_filter(filter).init();
            }
            LogFormat::Pretty => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_picks_defaults() {
        let config = LoggingConfig::default();
        assert_eq!(
            config.resolve(Environment::Local),
            ("debug".to_string(), LogFormat::Pretty)
        );
        assert_eq!(
            config.resolve(Environment::Dev),
            ("debug".to_string(), LogFormat::Json)
        );
        assert_eq!(
            config.resolve(Environment::Prod),
            ("info".to_string(), LogFormat::Json)
        );
    }

    #[test]
    fn explicit_values_override_environment() {
        let config = LoggingConfig {
            level: Some("warn,orderbridge=trace".into()),
            format: Some(LogFormat::Pretty),
        };
        assert_eq!(
            config.resolve(Environment::Prod),
            ("warn,orderbridge=trace".to_string(), LogFormat::Pretty)
        );
    }
}
