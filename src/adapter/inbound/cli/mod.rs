//! Command-line entry points.

pub mod check;
pub mod command;
pub mod import;
pub mod migrate;
pub mod output;
pub mod serve;

use std::path::Path;
use std::process::ExitCode;

use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use command::{CheckCommand, Cli, Commands};

/// Load the configuration file, falling back to defaults when it is absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read, parsed or
/// validated.
pub fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        Config::load(path)
    } else {
        output::warning(&format!(
            "{} not found, using built-in defaults",
            path.display()
        ));
        Config::parse_toml("")
    }
}

/// Resolve `path` against a server base URL.
///
/// The base is treated as a directory, so a prefix such as
/// `http://host/orders-svc` is kept rather than replaced.
///
/// # Errors
///
/// Returns [`Error::Url`](crate::error::Error::Url) if `base` is not a valid URL.
pub fn server_endpoint(base: &str, path: &str) -> Result<url::Url> {
    let mut base = url::Url::parse(base)?;
    if !base.path().ends_with('/') {
        let dir = format!("{}/", base.path());
        base.set_path(&dir);
    }
    Ok(base.join(path)?)
}

/// Run the parsed command line.
///
/// # Errors
///
/// Returns the failing command's error.
pub async fn execute(cli: Cli) -> Result<ExitCode> {
    let config = load_config(&cli.config)?;

    // `serve` initializes logging itself, after applying its overrides.
    if !matches!(cli.command, Commands::Serve(_)) {
        config.init_logging();
    }

    match cli.command {
        Commands::Serve(args) => serve::execute(config, &args).await?,
        Commands::Migrate => migrate::execute(&config)?,
        Commands::Import(args) => {
            let summary = import::execute(&config, &args).await?;
            if summary.failed > 0 {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Check(CheckCommand::Config) => check::execute_config(&cli.config, &config)?,
        Commands::Check(CheckCommand::Database) => check::execute_database(&config)?,
        Commands::Check(CheckCommand::Ready { url }) => check::execute_ready(&url).await?,
    }
    Ok(ExitCode::SUCCESS)
}
