//! Handler for the `migrate` command.

use crate::adapter::inbound::cli::output;
use crate::adapter::outbound::sqlite::{create_pool, run_migrations};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Execute the migrate command.
pub fn execute(config: &Config) -> Result<()> {
    let pool = create_pool(&config.database)?;
    let applied = run_migrations(&pool)?;

    output::section("Migrations");
    output::field("Database", &config.database);
    output::field("Applied", applied);
    output::success("Schema is up to date");
    Ok(())
}
