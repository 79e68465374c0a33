use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DecodeError;

/// Normalized, comparable form of a console-issued service token.
///
/// The hex encoding of the base64-decoded header value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Build a fingerprint from decoded token bytes
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(hex::encode(bytes))
    }

    /// The lowercase hex string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The service token presented with one request, after decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceToken {
    /// The header decoded cleanly
    Decoded {
        /// Header value as received
        raw: String,
        /// Hex fingerprint of the decoded bytes
        fingerprint: Fingerprint,
    },

    /// The header was missing or malformed
    Undecodable {
        /// Header value as received (possibly empty)
        raw: String,
        /// Why decoding failed
        error: DecodeError,
    },
}

impl ServiceToken {
    /// Header value exactly as the console sent it
    #[must_use]
    pub fn raw(&self) -> &str {
        match self {
            Self::Decoded { raw, .. } | Self::Undecodable { raw, .. } => raw,
        }
    }

    /// The fingerprint, if decoding succeeded
    #[must_use]
    pub const fn fingerprint(&self) -> Option<&Fingerprint> {
        match self {
            Self::Decoded { fingerprint, .. } => Some(fingerprint),
            Self::Undecodable { .. } => None,
        }
    }

    /// Best-effort identity string: the fingerprint, or the raw header
    /// when decoding failed. Only suitable for logging.
    #[must_use]
    pub fn display_identity(&self) -> &str {
        match self {
            Self::Decoded { fingerprint, .. } => fingerprint.as_str(),
            Self::Undecodable { raw, .. } => raw,
        }
    }

    /// Whether ban and group lists may be consulted for this token.
    ///
    /// A fallback identity or an empty token can never legitimately match a
    /// stored key.
    #[must_use]
    pub fn is_ban_check_eligible(&self) -> bool {
        match self {
            Self::Decoded { fingerprint, .. } => !fingerprint.as_str().is_empty(),
            Self::Undecodable { .. } => false,
        }
    }
}
