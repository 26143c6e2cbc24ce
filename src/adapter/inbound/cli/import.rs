//! Handler for the `import` command.
//!
//! Reads one order or an array of orders from a JSON file and submits each
//! one, either straight into the database or to a running server's
//! `POST /api/orders`. Posting keeps the server's cache in step; writing the
//! database directly is for seeding a server that is not running.

use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::adapter::inbound::cli::command::ImportArgs;
use crate::adapter::inbound::cli::{output, server_endpoint};
use crate::adapter::outbound::sqlite::SqliteOrderStore;
use crate::domain::{Order, OrderUid};
use crate::error::{ConfigError, Error, Result};
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::orchestration::open_store;
use crate::port::OrderStore;

#[derive(Deserialize)]
#[serde(untagged)]
enum ImportDocument {
    Many(Vec<serde_json::Value>),
    One(serde_json::Value),
}

/// Outcome of an import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub failed: usize,
}

/// Where imported orders go.
pub enum ImportSink {
    Store(SqliteOrderStore),
    Http {
        client: reqwest::Client,
        endpoint: url::Url,
    },
}

impl ImportSink {
    /// A sink posting to `{base}/api/orders`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Url`] if `base` is not a valid URL.
    pub fn http(base: &str) -> Result<Self> {
        let endpoint = server_endpoint(base, "api/orders")?;
        Ok(Self::Http {
            client: reqwest::Client::new(),
            endpoint,
        })
    }

    async fn submit(&self, payload: Vec<u8>) -> Result<OrderUid> {
        match self {
            Self::Store(store) => {
                let order = Order::from_json(&payload)?;
                store.save_order(&order).await?;
                Ok(order.order_uid)
            }
            Self::Http { client, endpoint } => {
                let response = client
                    .post(endpoint.clone())
                    .header(reqwest::header::CONTENT_TYPE, "application/json")
                    .body(payload)
                    .send()
                    .await?;
                let status = response.status();
                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(Error::Connection(format!("server answered {status}: {body}")));
                }
                let order: Order = response.json().await?;
                Ok(order.order_uid)
            }
        }
    }
}

/// Read the documents held by an import file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not JSON.
pub fn read_documents(path: &Path) -> Result<Vec<serde_json::Value>> {
    let content = std::fs::read(path)?;
    Ok(match serde_json::from_slice::<ImportDocument>(&content)? {
        ImportDocument::Many(documents) => documents,
        ImportDocument::One(document) => vec![document],
    })
}

/// Submit every document, continuing past failures.
pub async fn import_documents(documents: Vec<serde_json::Value>, sink: &ImportSink) -> ImportSummary {
    let mut summary = ImportSummary::default();
    for (index, document) in documents.into_iter().enumerate() {
        let result = match serde_json::to_vec(&document) {
            Ok(payload) => sink.submit(payload).await,
            Err(e) => Err(e.into()),
        };
        match result {
            Ok(uid) => {
                summary.imported += 1;
                output::success(&format!("imported {uid}"));
            }
            Err(e) => {
                summary.failed += 1;
                warn!(index, error = %e, "Order import failed");
                output::error(&format!("document #{index}: {e}"));
            }
        }
    }
    summary
}

/// Execute the import command.
pub async fn execute(config: &Config, args: &ImportArgs) -> Result<ImportSummary> {
    let documents = read_documents(&args.file)?;

    let sink = match &args.url {
        Some(base) => ImportSink::http(base)?,
        None => ImportSink::Store(open_store(&config.database)?),
    };

    output::section("Import");
    output::field("File", args.file.display());
    match &args.url {
        Some(base) => output::field("Target", base),
        None => output::field("Target", &config.database),
    }

    let summary = import_documents(documents, &sink).await;

    output::section("Summary");
    output::field("Imported", summary.imported);
    output::field("Failed", summary.failed);

    if summary.imported == 0 && summary.failed == 0 {
        return Err(ConfigError::InvalidValue {
            field: "file",
            reason: "contains no orders".to_string(),
        }
        .into());
    }
    Ok(summary)
}
