//! Handler for the `serve` command.

use crate::adapter::inbound::cli::command::ServeArgs;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::orchestration;

/// Execute the serve command.
pub async fn execute(mut config: Config, args: &ServeArgs) -> Result<()> {
    apply_overrides(&mut config, args)?;
    config.init_logging();
    orchestration::execute_serve(config).await
}

fn apply_overrides(config: &mut Config, args: &ServeArgs) -> Result<()> {
    if let Some(address) = &args.address {
        config.http.address.clone_from(address);
    }
    if args.no_feed {
        config.feed.enabled = false;
    }
    config.validate()
}
