//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Lowest bcrypt cost accepted by the hashing library.
const MIN_COST: i64 = 4;

/// Highest bcrypt cost accepted by the hashing library.
const MAX_COST: i64 = 31;

/// Console service discovery server
///
/// Tells consoles which hosts to use, or why they cannot connect.
#[derive(Parser, Debug)]
#[command(name = "discoveryd")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the YAML configuration file
    #[arg(
        short,
        long,
        env = "DISCOVERY_CONFIG",
        default_value = "config.yaml",
        global = true
    )]
    pub config: PathBuf,

    /// Log level, used when RUST_LOG is not set
    #[arg(long, env = "DISCOVERY_LOG_LEVEL", default_value = "info", global = true)]
    pub log_level: String,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the discovery server
    Serve,

    /// Validate the configuration and summarize it
    Check,

    /// Decode header values the way the server does
    Decode(DecodeArgs),

    /// Generate a bcrypt key for the bans or groupdefs lists
    Hash(HashArgs),
}

// ============================================================================
// Decode command
// ============================================================================

#[derive(Args, Debug)]
pub struct DecodeArgs {
    #[command(subcommand)]
    pub command: DecodeCommands,
}

#[derive(Subcommand, Debug)]
pub enum DecodeCommands {
    /// Print the fingerprint of an X-Nintendo-Servicetoken value
    Token {
        /// Header value (base64)
        value: String,
    },

    /// Print the fields of an X-Nintendo-Parampack value
    Parampack {
        /// Header value (base64)
        value: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

// ============================================================================
// Hash command
// ============================================================================

#[derive(Args, Debug)]
pub struct HashArgs {
    /// Service token exactly as sent in X-Nintendo-Servicetoken
    pub token: String,

    /// Hash the token fingerprint for groupdefs instead of the raw token
    #[arg(long)]
    pub group: bool,

    /// bcrypt cost factor
    #[arg(
        long,
        default_value = "12",
        value_parser = clap::value_parser!(u32).range(MIN_COST..=MAX_COST)
    )]
    pub cost: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_hash_defaults() {
        let cli = Cli::try_parse_from(["discoveryd", "hash", "dG9rZW4="]).unwrap();
        match cli.command {
            Commands::Hash(args) => {
                assert_eq!(args.token, "dG9rZW4=");
                assert!(!args.group);
                assert_eq!(args.cost, 12);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(cli.config, PathBuf::from("config.yaml"));
    }

    #[test]
    fn test_cost_out_of_range() {
        assert!(Cli::try_parse_from(["discoveryd", "hash", "x", "--cost", "3"]).is_err());
        assert!(Cli::try_parse_from(["discoveryd", "hash", "x", "--cost", "32"]).is_err());
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli = Cli::try_parse_from(["discoveryd", "check", "--config", "/etc/discovery.yaml"])
            .unwrap();
        assert!(matches!(cli.command, Commands::Check));
        assert_eq!(cli.config, PathBuf::from("/etc/discovery.yaml"));
    }
}
