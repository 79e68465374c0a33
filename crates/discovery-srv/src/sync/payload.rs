//! Parsers for remote policy documents.
//!
//! The media type picks the format:
//! - `text/plain`: one `key: value` pair per line (legacy sources)
//! - `application/json`: a JSON object (current sources)
//!
//! Anything else is rejected so the previous snapshot stays in place.

use discovery_client::{PolicyDocument, MEDIA_TYPE_JSON, MEDIA_TYPE_TEXT};
use discovery_core::{DiscoveryError, Result};
use serde::Deserialize;
use std::collections::HashMap;

use crate::policy::{BanEntry, BanList, GroupDefinitions};

/// Key carrying the flag in maintenance documents.
const MAINTENANCE_KEY: &str = "inMaintenance";

/// Separator between key and value in legacy text documents.
const LINE_SEPARATOR: &str = ": ";

enum Format {
    Text,
    Json,
}

/// JSON maintenance documents: `{"inMaintenance": true}` or bare `true`.
#[derive(Deserialize)]
#[serde(untagged)]
enum MaintenanceDocument {
    Flag(bool),
    Object {
        #[serde(rename = "inMaintenance")]
        in_maintenance: bool,
    },
}

/// Parse a maintenance document.
///
/// Only `true` and `false` are accepted as the flag.
pub fn parse_maintenance(doc: &PolicyDocument) -> Result<bool> {
    match format_of(doc)? {
        Format::Text => {
            let lines = parse_lines(&doc.body)?;
            let (_, value) = lines
                .iter()
                .rev()
                .find(|(key, _)| *key == MAINTENANCE_KEY)
                .ok_or_else(|| {
                    DiscoveryError::Parse(format!("missing {MAINTENANCE_KEY} line"))
                })?;
            value.parse::<bool>().map_err(|_| {
                DiscoveryError::Parse(format!("incorrectly formatted boolean: {value:?}"))
            })
        }
        Format::Json => match serde_json::from_str::<MaintenanceDocument>(&doc.body)? {
            MaintenanceDocument::Flag(flag)
            | MaintenanceDocument::Object {
                in_maintenance: flag,
            } => Ok(flag),
        },
    }
}

/// Parse a ban list document into key -> reason.
pub fn parse_bans(doc: &PolicyDocument) -> Result<BanList> {
    match format_of(doc)? {
        Format::Text => Ok(parse_lines(&doc.body)?
            .into_iter()
            .map(|(key, reason)| (key.to_string(), reason.to_string()))
            .collect()),
        Format::Json => {
            let entries: HashMap<String, BanEntry> = serde_json::from_str(&doc.body)?;
            Ok(entries
                .into_iter()
                .map(|(key, entry)| (key, entry.into_reason()))
                .collect())
        }
    }
}

/// Parse a group definition document into key -> group name.
pub fn parse_group_definitions(doc: &PolicyDocument) -> Result<GroupDefinitions> {
    match format_of(doc)? {
        Format::Text => Ok(parse_lines(&doc.body)?
            .into_iter()
            .map(|(key, group)| (key.to_string(), group.to_string()))
            .collect()),
        Format::Json => Ok(serde_json::from_str(&doc.body)?),
    }
}

fn format_of(doc: &PolicyDocument) -> Result<Format> {
    match doc.media_type().as_deref() {
        Some(MEDIA_TYPE_TEXT) => Ok(Format::Text),
        Some(MEDIA_TYPE_JSON) => Ok(Format::Json),
        Some(other) => Err(DiscoveryError::Parse(format!(
            "unsupported content type {other:?}"
        ))),
        None => Err(DiscoveryError::Parse("missing content type".into())),
    }
}

/// Split a legacy document into `(key, value)` pairs.
///
/// Blank lines are skipped; any other line without `": "` fails the whole
/// document.
fn parse_lines(body: &str) -> Result<Vec<(&str, &str)>> {
    body.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            line.split_once(LINE_SEPARATOR)
                .map(|(key, value)| (key.trim(), value.trim()))
                .ok_or_else(|| {
                    DiscoveryError::Parse(format!(
                        "line {} is not a `key: value` pair",
                        index + 1
                    ))
                })
        })
        .collect()
}
