//! Command implementations.

pub mod check;
pub mod decode;
pub mod hash;
pub mod serve;

use anyhow::{Context as _, Result};
use discovery_srv::ServerConfig;
use std::path::PathBuf;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Configuration file path
    pub config: PathBuf,
}

impl Context {
    /// Load and validate the configuration file.
    pub fn load_config(&self) -> Result<ServerConfig> {
        ServerConfig::load(&self.config)
            .with_context(|| format!("invalid configuration in {}", self.config.display()))
    }
}
