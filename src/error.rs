use thiserror::Error;

use crate::domain::error::OrderError;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error("malformed order document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(Box<tokio_tungstenite::tungstenite::Error>),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True when the error confirms the order is absent.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Order(OrderError::NotFound(_)))
    }

    /// True when the input itself was rejected: malformed JSON or an
    /// aggregate that fails validation.
    #[must_use]
    pub fn is_decode_failure(&self) -> bool {
        matches!(self, Self::Json(_) | Self::Order(OrderError::Invalid { .. }))
    }

    /// True when a store or transport could not complete the operation.
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Connection(_)
                | Self::Database(_)
                | Self::Parse(_)
                | Self::Io(_)
                | Self::WebSocket(_)
                | Self::Http(_)
        )
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for Error {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Error::WebSocket(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderUid;

    #[test]
    fn taxonomy_is_disjoint() {
        let not_found: Error = OrderError::NotFound(OrderUid::from("x")).into();
        assert!(not_found.is_not_found());
        assert!(!not_found.is_upstream());
        assert!(!not_found.is_decode_failure());

        let invalid: Error = OrderError::invalid("empty").into();
        assert!(invalid.is_decode_failure());
        assert!(!invalid.is_not_found());

        let db = Error::Database("disk I/O error".into());
        assert!(db.is_upstream());
        assert!(!db.is_not_found());
    }

    #[test]
    fn json_errors_are_decode_failures() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(err.is_decode_failure());
    }
}
