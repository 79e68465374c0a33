//! `discoveryd hash` - generate keys for the bans and groupdefs lists.
//!
//! Ban keys hash the header value as sent; group keys hash its fingerprint.

use anyhow::{bail, Context as _, Result};
use discovery_core::credentials::read_service_token;
use discovery_core::ServiceToken;
use discovery_srv::policy::TokenKeys;

use super::Context;
use crate::cli::args::HashArgs;

pub fn execute(_ctx: &Context, args: &HashArgs) -> Result<()> {
    println!("{}", make_key(args)?);
    Ok(())
}

fn make_key(args: &HashArgs) -> Result<String> {
    // The server never probes the lists for these tokens.
    let token = read_service_token(&args.token);
    let fingerprint = match &token {
        ServiceToken::Undecodable { error, .. } => {
            bail!("keys need a decodable service token: {error}")
        }
        ServiceToken::Decoded { fingerprint, .. } if fingerprint.as_str().is_empty() => {
            bail!("keys need a non-empty service token")
        }
        ServiceToken::Decoded { fingerprint, .. } => fingerprint,
    };
    let candidate = if args.group {
        fingerprint.as_str()
    } else {
        token.raw()
    };

    TokenKeys::Bcrypt
        .make_key(candidate, args.cost)
        .context("bcrypt hashing failed")
}
