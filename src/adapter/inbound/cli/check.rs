//! Handlers for the `check` subcommands.

use std::path::Path;

use crate::adapter::inbound::cli::{output, server_endpoint};
use crate::adapter::outbound::sqlite::{create_pool, pending_migrations};
use crate::error::{Error, Result};
use crate::infrastructure::config::settings::Config;

/// Validate the configuration file without starting the service.
pub fn execute_config(path: &Path, config: &Config) -> Result<()> {
    output::section("Configuration Check");
    output::field("Config", path.display());
    output::success("Configuration file is valid");

    output::section("Summary");
    output::field("Environment", format!("{:?}", config.env).to_lowercase());
    output::field("Database", &config.database);
    output::field("HTTP address", &config.http.address);
    output::field("Static dir", &config.http.static_dir);
    if config.feed.enabled {
        output::field("Feed", &config.feed.url);
        output::field("Topic", &config.feed.topic);
        output::field("Group", &config.feed.group_id);
    } else {
        output::field("Feed", "disabled");
    }

    if !Path::new(&config.http.static_dir).is_dir() {
        output::warning("Static directory not found; the web UI will not be served");
    }
    Ok(())
}

/// Open the database and report pending migrations.
pub fn execute_database(config: &Config) -> Result<()> {
    let pool = create_pool(&config.database)?;
    let pending = pending_migrations(&pool)?;

    output::section("Database Check");
    output::field("Database", &config.database);
    output::success("Connection established");
    if pending == 0 {
        output::success("Schema is up to date");
    } else {
        output::warning(&format!(
            "{pending} pending migration(s); run `orderbridge migrate` or start `serve`"
        ));
    }
    Ok(())
}

/// Query a running server's readiness probe.
pub async fn execute_ready(base: &str) -> Result<()> {
    let endpoint = server_endpoint(base, "health/ready")?;
    let response = reqwest::get(endpoint.clone()).await?;
    let status = response.status();
    let body: serde_json::Value = response.json().await?;

    output::section("Readiness Check");
    output::field("Endpoint", &endpoint);
    output::field("Status", status);
    output::field("Preload", &body["preload"]["state"]);
    output::field("Cached", &body["cached_orders"]);

    if status.is_success() {
        output::success("Server is ready");
        Ok(())
    } else {
        Err(Error::Connection(format!("server not ready ({status})")))
    }
}
