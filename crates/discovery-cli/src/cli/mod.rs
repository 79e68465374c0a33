//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::{Context as _, Result};
use args::{Cli, Commands};
use clap::Parser;

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level)?;

    if cli.no_color {
        colored::control::set_override(false);
    }

    let ctx = commands::Context { config: cli.config };

    match cli.command {
        Commands::Serve => commands::serve::execute(ctx).await,
        Commands::Check => commands::check::execute(&ctx),
        Commands::Decode(args) => commands::decode::execute(&ctx, args),
        Commands::Hash(args) => commands::hash::execute(&ctx, &args),
    }
}

/// Install the tracing subscriber. `RUST_LOG` wins over `level`.
///
/// Logs go to stderr so command output on stdout stays pipeable.
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    Ok(())
}
