//! discoveryd - console service discovery server.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    discovery_cli::run().await
}
