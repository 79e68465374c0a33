use thiserror::Error;

/// Result type alias for discovery operations
pub type Result<T> = std::result::Result<T, DiscoveryError>;

/// Failure to decode a console-supplied header value.
///
/// Always recovered locally: the request continues with degraded context.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The header was absent or blank
    #[error("header value is empty")]
    Empty,

    /// The header was not valid standard base64
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Errors that can occur while fetching or interpreting policy data
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// Header decoding failed
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// HTTP request to a policy source failed
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Policy source answered with a non-success status
    #[error("policy source {url} returned status {code}")]
    Status {
        /// URL that was fetched
        url: String,
        /// HTTP status code
        code: u16,
    },

    /// Remote policy payload did not match the expected schema
    #[error("malformed policy payload: {0}")]
    Parse(String),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl DiscoveryError {
    /// Returns true if the error happened while reaching the policy source,
    /// as opposed to interpreting what it sent back
    #[must_use]
    pub const fn is_fetch_error(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Status { .. })
    }

    /// Returns the HTTP status code if the source answered with one
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}
