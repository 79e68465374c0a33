//! # discovery-cli
//!
//! The `discoveryd` binary: runs the discovery server and offers a few
//! operator tools around it.
//!
//! - **serve**: load the YAML configuration and answer discovery requests
//! - **check**: validate a configuration and summarize what it would do
//! - **decode**: inspect service token and parameter pack header values
//! - **hash**: produce bcrypt keys for the `bans` and `groupdefs` lists

pub mod cli;

pub use cli::run;
