//! `discoveryd serve` - run the discovery server.

use anyhow::Result;
use tracing::info;

use super::Context;

pub async fn execute(ctx: Context) -> Result<()> {
    let config = ctx.load_config()?;
    info!(config = %ctx.config.display(), "configuration loaded");

    discovery_srv::server::run(&config).await?;
    Ok(())
}
