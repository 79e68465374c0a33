//! Ban list matching.

use serde::{Deserialize, Serialize};

use super::state::PolicyState;

/// One ban list value as written in configuration or a JSON source.
///
/// Either a bare reason string or an object with a `reason` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BanEntry {
    /// `key: reason`
    Reason(String),

    /// `key: { reason: ... }`
    Detailed {
        /// Message shown to the banned console
        reason: String,
    },
}

impl BanEntry {
    /// Consume into the ban reason
    #[must_use]
    pub fn into_reason(self) -> String {
        match self {
            Self::Reason(reason) | Self::Detailed { reason } => reason,
        }
    }
}

/// Check the raw service token header against the ban list.
///
/// Returns the reason of the first matching entry. With bcrypt keys every
/// entry is probed, so cost grows with the list.
pub fn is_banned<'a>(raw_token: &str, state: &'a PolicyState) -> Option<&'a str> {
    state
        .token_keys
        .find(raw_token, &state.bans)
        .map(|(_, reason)| reason.as_str())
}
