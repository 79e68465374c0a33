//! Keeping remotely sourced policy fresh.
//!
//! - **Payload**: parsers for legacy `key: value` text and JSON documents
//! - **Refresher**: one independent polling task per remote domain

pub mod payload;
pub mod refresher;

pub use refresher::{PolicyDomain, RefreshTask, Refresher};
