//! Core types and credential decoding for the discovery server.
//!
//! This crate provides the foundational pieces shared by the server, the
//! policy source client and the command-line tool:
//!
//! - **Types**: the service-token fingerprint, the decoded parameter pack,
//!   endpoint sets and the [`DiscoveryResult`] handed back to consoles
//! - **Credentials**: best-effort decoding of the `X-Nintendo-Servicetoken`
//!   and `X-Nintendo-Parampack` headers
//! - **Errors**: [`DiscoveryError`] and [`DecodeError`]
//!
//! # Example
//!
//! ```rust,ignore
//! use discovery_core::credentials;
//!
//! let fingerprint = credentials::decode_service_token("3q2+7w==")?;
//! assert_eq!(fingerprint.as_str(), "deadbeef");
//! ```

pub mod credentials;
mod error;
pub mod types;

pub use error::{DecodeError, DiscoveryError, Result};
pub use types::*;
