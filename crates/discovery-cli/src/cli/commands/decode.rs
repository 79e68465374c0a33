//! `discoveryd decode` - inspect request header values.

use anyhow::{Context as _, Result};
use colored::Colorize;
use discovery_core::credentials::{decode_param_pack, decode_service_token};
use discovery_core::ParamPack;

use super::Context;
use crate::cli::args::{DecodeArgs, DecodeCommands};

pub fn execute(_ctx: &Context, args: DecodeArgs) -> Result<()> {
    match args.command {
        DecodeCommands::Token { value } => decode_token(&value),
        DecodeCommands::Parampack { value, json } => decode_parampack(&value, json),
    }
}

fn decode_token(value: &str) -> Result<()> {
    let fingerprint =
        decode_service_token(value).context("service token could not be decoded")?;
    println!("{fingerprint}");
    Ok(())
}

fn decode_parampack(value: &str, json: bool) -> Result<()> {
    let (pack, error) = decode_param_pack(value);
    if let Some(e) = error {
        return Err(e).context("parameter pack could not be decoded");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&pack)?);
    } else {
        print_pack(&pack)?;
    }
    Ok(())
}

fn print_pack(pack: &ParamPack) -> Result<()> {
    let serde_json::Value::Object(fields) = serde_json::to_value(pack)? else {
        anyhow::bail!("parameter pack did not serialize to an object");
    };

    let width = fields.keys().map(String::len).max().unwrap_or_default();
    for (name, value) in &fields {
        let shown = match value {
            serde_json::Value::String(s) if s.is_empty() => "(empty)".dimmed().to_string(),
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        println!("{}  {shown}", format!("{name:<width$}").bold());
    }
    Ok(())
}
