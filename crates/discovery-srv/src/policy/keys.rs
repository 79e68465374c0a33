//! Comparison of request tokens against stored ban/group keys.
//!
//! With bcrypt keys every entry carries its own salt, so there is no way to
//! hash the candidate once and look it up: each entry is verified in turn.
//! Lookup cost is linear in the number of entries.
//!
//! bcrypt only reads the first 72 bytes of its input, and both candidates
//! (the raw token header and its hex fingerprint) are longer than that. The
//! candidate is therefore reduced to the hex SHA-256 of its bytes before it
//! is hashed or verified.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

/// How ban list and group definition keys are stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKeys {
    /// Keys are bcrypt hashes of the candidate
    #[default]
    Bcrypt,

    /// Keys are the candidate strings themselves
    Plaintext,
}

impl TokenKeys {
    /// Find the first entry whose key matches `candidate`.
    ///
    /// Iteration order among bcrypt entries is unspecified; entries are
    /// expected to be mutually exclusive by token.
    pub fn find<'a, V>(
        self,
        candidate: &str,
        entries: &'a HashMap<String, V>,
    ) -> Option<(&'a str, &'a V)> {
        match self {
            Self::Plaintext => entries
                .get_key_value(candidate)
                .map(|(key, value)| (key.as_str(), value)),
            Self::Bcrypt => {
                let digest = bcrypt_input(candidate);
                entries
                    .iter()
                    .find(|(key, _)| verify_bcrypt(&digest, key))
                    .map(|(key, value)| (key.as_str(), value))
            }
        }
    }

    /// Produce a key for `candidate` in this scheme.
    pub fn make_key(self, candidate: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
        match self {
            Self::Plaintext => Ok(candidate.to_string()),
            Self::Bcrypt => bcrypt::hash(bcrypt_input(candidate), cost),
        }
    }

    /// Returns true if `key` has the shape this scheme expects
    #[must_use]
    pub fn is_well_formed(self, key: &str) -> bool {
        match self {
            Self::Plaintext => !key.is_empty(),
            Self::Bcrypt => key.parse::<bcrypt::HashParts>().is_ok(),
        }
    }
}

impl fmt::Display for TokenKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bcrypt => write!(f, "bcrypt"),
            Self::Plaintext => write!(f, "plaintext"),
        }
    }
}

/// What bcrypt actually sees for `candidate`: 64 hex chars, under its limit.
fn bcrypt_input(candidate: &str) -> String {
    hex::encode(Sha256::digest(candidate.as_bytes()))
}

fn verify_bcrypt(digest: &str, stored: &str) -> bool {
    match bcrypt::verify(digest, stored) {
        Ok(matched) => matched,
        Err(e) => {
            warn!(error = %e, "stored key is not a valid bcrypt hash, skipping entry");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum bcrypt cost keeps the tests fast.
    const COST: u32 = 4;

    fn bcrypt_key(candidate: &str) -> String {
        TokenKeys::Bcrypt.make_key(candidate, COST).unwrap()
    }

    #[test]
    fn test_bcrypt_find() {
        let mut entries = HashMap::new();
        entries.insert(bcrypt_key("token-a"), "a");
        entries.insert(bcrypt_key("token-b"), "b");

        let (_, value) = TokenKeys::Bcrypt.find("token-b", &entries).unwrap();
        assert_eq!(*value, "b");
        assert!(TokenKeys::Bcrypt.find("token-c", &entries).is_none());
    }

    #[test]
    fn test_bcrypt_distinguishes_long_shared_prefix() {
        let prefix = "0".repeat(90);
        let console_a = format!("{prefix}console-A");
        let console_b = format!("{prefix}console-B");

        let mut entries = HashMap::new();
        entries.insert(bcrypt_key(&console_a), "banned");

        assert!(TokenKeys::Bcrypt.find(&console_a, &entries).is_some());
        assert!(TokenKeys::Bcrypt.find(&console_b, &entries).is_none());
    }

    #[test]
    fn test_bcrypt_invalid_entry_is_skipped() {
        let mut entries = HashMap::new();
        entries.insert("not-a-hash".to_string(), "broken");
        entries.insert(bcrypt_key("token-a"), "a");

        let (_, value) = TokenKeys::Bcrypt.find("token-a", &entries).unwrap();
        assert_eq!(*value, "a");
        assert!(TokenKeys::Bcrypt.find("not-a-hash", &entries).is_none());
    }

    #[test]
    fn test_plaintext_find() {
        let mut entries = HashMap::new();
        entries.insert("token-a".to_string(), 1);

        assert_eq!(
            TokenKeys::Plaintext.find("token-a", &entries),
            Some(("token-a", &1))
        );
        assert!(TokenKeys::Plaintext.find("token-b", &entries).is_none());
    }

    #[test]
    fn test_make_key_round_trip() {
        let key = TokenKeys::Bcrypt.make_key("token-a", COST).unwrap();
        assert!(TokenKeys::Bcrypt.is_well_formed(&key));
        assert!(bcrypt::verify(bcrypt_input("token-a"), &key).unwrap());
        assert!(!bcrypt::verify("token-a", &key).unwrap());

        let key = TokenKeys::Plaintext.make_key("token-a", COST).unwrap();
        assert_eq!(key, "token-a");
        assert!(!TokenKeys::Bcrypt.is_well_formed(&key));
    }

    #[test]
    fn test_deserialize_lowercase() {
        let keys: TokenKeys = serde_yaml::from_str("plaintext").unwrap();
        assert_eq!(keys, TokenKeys::Plaintext);
        assert_eq!(TokenKeys::default().to_string(), "bcrypt");
    }
}
