//! HTTP client for remote discovery policy sources.
//!
//! This crate provides [`PolicyClient`], which the background refresher uses
//! to pull maintenance status, ban lists and group definitions from URLs,
//! and the [`FetchPolicy`] trait it is consumed through.

mod client;
mod document;

pub use client::{PolicyClient, PolicyClientBuilder};
pub use document::{FetchPolicy, PolicyDocument, MEDIA_TYPE_JSON, MEDIA_TYPE_TEXT};
pub use discovery_core::{DiscoveryError, Result};
