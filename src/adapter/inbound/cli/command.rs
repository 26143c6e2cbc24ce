//! Command-line interface definitions.
//!
//! Defines the CLI structure for the orderbridge binary using `clap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Order ingestion service with a write-through cache over SQLite
#[derive(Parser, Debug)]
#[command(name = "orderbridge")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API and, if enabled, the order feed consumer
    Serve(ServeArgs),

    /// Apply pending database migrations and exit
    Migrate,

    /// Import orders from a JSON file
    Import(ImportArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),
}

/// Arguments for `orderbridge serve`.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Listen address, overriding `http.address`
    #[arg(long)]
    pub address: Option<String>,

    /// Do not start the order feed consumer
    #[arg(long)]
    pub no_feed: bool,
}

/// Arguments for `orderbridge import`.
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// JSON file holding one order or an array of orders
    pub file: PathBuf,

    /// Post orders to a running server (e.g. `http://127.0.0.1:8080`)
    /// instead of writing the database directly
    #[arg(long)]
    pub url: Option<String>,
}

/// Subcommands for `orderbridge check`.
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate the configuration file
    Config,
    /// Open the database and report migration status
    Database,
    /// Query a running server's readiness probe
    Ready {
        /// Base URL of the server
        #[arg(long, default_value = "http://127.0.0.1:8080")]
        url: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_accepts_overrides() {
        let cli = Cli::parse_from([
            "orderbridge",
            "--config",
            "custom.toml",
            "serve",
            "--address",
            "0.0.0.0:9000",
            "--no-feed",
        ]);
        assert_eq!(cli.config, PathBuf::from("custom.toml"));
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.address.as_deref(), Some("0.0.0.0:9000"));
                assert!(args.no_feed);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn config_defaults_to_local_file() {
        let cli = Cli::parse_from(["orderbridge", "migrate"]);
        assert_eq!(cli.config, PathBuf::from("config.toml"));
        assert!(matches!(cli.command, Commands::Migrate));
    }

    #[test]
    fn import_takes_a_file_and_optional_url() {
        let cli = Cli::parse_from(["orderbridge", "import", "orders.json", "--url", "http://h"]);
        match cli.command {
            Commands::Import(args) => {
                assert_eq!(args.file, PathBuf::from("orders.json"));
                assert_eq!(args.url.as_deref(), Some("http://h"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn check_ready_has_default_url() {
        let cli = Cli::parse_from(["orderbridge", "check", "ready"]);
        assert!(matches!(
            cli.command,
            Commands::Check(CheckCommand::Ready { ref url }) if url == "http://127.0.0.1:8080"
        ));
    }
}
