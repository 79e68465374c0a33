//! Error types for the discovery server.

use discovery_core::DiscoveryError;
use thiserror::Error;

/// Errors that can occur in discovery-srv operations.
#[derive(Error, Debug)]
pub enum SrvError {
    /// Configuration is invalid or missing required fields.
    #[error("config error: {0}")]
    Config(String),

    /// A group definition names an endpoint set that does not exist.
    #[error("group {0:?} has no endpoint set configured")]
    UnknownGroup(String),

    /// Response encoding failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// HTTP server failed to bind or run.
    #[error("http server error: {0}")]
    Server(String),

    /// Fetching or parsing policy data failed.
    #[error(transparent)]
    Core(#[from] DiscoveryError),

    /// YAML error.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl SrvError {
    /// Returns true if a policy source could not be reached or refused the
    /// request, as opposed to sending something unusable.
    #[must_use]
    pub const fn is_fetch_error(&self) -> bool {
        matches!(self, Self::Core(e) if e.is_fetch_error())
    }

    /// HTTP status a policy source answered with, if that was the failure.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Core(e) => e.status_code(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_failures_are_classified() {
        let err = SrvError::from(DiscoveryError::Status {
            url: "https://status.example.net/bans".into(),
            code: 502,
        });
        assert!(err.is_fetch_error());
        assert_eq!(err.status_code(), Some(502));

        let err = SrvError::from(DiscoveryError::Http("connection refused".into()));
        assert!(err.is_fetch_error());
        assert_eq!(err.status_code(), None);

        let err = SrvError::from(DiscoveryError::Parse("expected a boolean".into()));
        assert!(!err.is_fetch_error());
        assert!(!SrvError::Config("bad".into()).is_fetch_error());
    }
}
