//! discovery-srv: policy engine and HTTP server for console service discovery.
//!
//! Answers one question per request: which endpoints (or which error) should
//! this console be told to use?
//!
//! # Architecture
//!
//! - **Policy**: the shared [`policy::PolicyStore`] snapshot, ban matching,
//!   group endpoint resolution and the fixed-precedence fabricator
//! - **Sync**: one background refresh task per remotely sourced policy
//!   domain (maintenance, bans, group definitions)
//! - **Encoding**: XML rendering of [`discovery_core::DiscoveryResult`]
//! - **Server**: the axum handler that ties headers, policy and encoding
//!   together
//!
//! # Precedence
//!
//! Maintenance always wins, then a ban, then the resolved endpoint set.
//! Every request is evaluated once against the snapshot current at the time.

pub mod config;
pub mod encoding;
pub mod error;
pub mod policy;
pub mod server;
pub mod sync;

// Re-exports for convenience.
pub use config::ServerConfig;
pub use error::SrvError;

/// Result type for discovery-srv operations.
pub type Result<T> = std::result::Result<T, SrvError>;
