use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use orderbridge::adapter::inbound::cli::{self, command::Cli};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let _ = dotenvy::dotenv();
    let _ = rustls::crypto::ring::default_provider().install_default();

    let cli = Cli::parse();
    let code = cli::execute(cli).await.context("orderbridge failed")?;
    Ok(code)
}
