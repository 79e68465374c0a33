use serde::Serialize;

use super::EndpointSet;

/// Protocol version reported in every response.
pub const RESPONSE_VERSION: u32 = 1;

/// Top-level code carried by every error result.
pub const ERROR_CODE_BAD_REQUEST: u32 = 400;

/// Sub-code for the service being in maintenance.
pub const ERROR_SUBCODE_MAINTENANCE: u32 = 3;

/// Sub-code for a banned console.
pub const ERROR_SUBCODE_BANNED: u32 = 7;

/// Message sent while in maintenance.
pub const MAINTENANCE_MESSAGE: &str = "SERVICE_MAINTENANCE";

/// Top-level code of the generic server error.
pub const ERROR_CODE_SERVER: u32 = 500;

/// Sub-code of the generic server error.
pub const ERROR_SUBCODE_SERVER: u32 = 1;

/// Message of the generic server error.
pub const SERVER_ERROR_MESSAGE: &str = "SERVER_ERROR";

/// Outcome of evaluating one discovery request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiscoveryResult {
    /// The console is refused service
    Error {
        /// Top-level code
        code: u32,
        /// Sub-code
        error_code: u32,
        /// Message shown to the console
        message: String,
    },

    /// The console is told where to connect
    Endpoints(EndpointSet),
}

impl DiscoveryResult {
    /// The fixed maintenance result
    #[must_use]
    pub fn maintenance() -> Self {
        Self::Error {
            code: ERROR_CODE_BAD_REQUEST,
            error_code: ERROR_SUBCODE_MAINTENANCE,
            message: MAINTENANCE_MESSAGE.to_string(),
        }
    }

    /// A ban result carrying the stored reason
    #[must_use]
    pub fn banned(reason: impl Into<String>) -> Self {
        Self::Error {
            code: ERROR_CODE_BAD_REQUEST,
            error_code: ERROR_SUBCODE_BANNED,
            message: reason.into(),
        }
    }

    /// The generic result used when the server itself is misconfigured
    #[must_use]
    pub fn server_error() -> Self {
        Self::Error {
            code: ERROR_CODE_SERVER,
            error_code: ERROR_SUBCODE_SERVER,
            message: SERVER_ERROR_MESSAGE.to_string(),
        }
    }

    /// Returns true for the error variant
    #[must_use]
    pub const fn has_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Short label for logging
    #[must_use]
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Endpoints(_) => "endpoints",
            Self::Error { error_code, .. } if *error_code == ERROR_SUBCODE_MAINTENANCE => {
                "maintenance"
            }
            Self::Error { error_code, .. } if *error_code == ERROR_SUBCODE_BANNED => "banned",
            Self::Error { .. } => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maintenance_result() {
        let result = DiscoveryResult::maintenance();
        assert!(result.has_error());
        assert_eq!(result.outcome(), "maintenance");
        assert_eq!(
            result,
            DiscoveryResult::Error {
                code: 400,
                error_code: 3,
                message: "SERVICE_MAINTENANCE".into(),
            }
        );
    }

    #[test]
    fn test_banned_keeps_reason() {
        let result = DiscoveryResult::banned("cheating in splatfest");
        assert_eq!(result.outcome(), "banned");
        match result {
            DiscoveryResult::Error { error_code, message, .. } => {
                assert_eq!(error_code, 7);
                assert_eq!(message, "cheating in splatfest");
            }
            DiscoveryResult::Endpoints(_) => panic!("expected error"),
        }
    }

    #[test]
    fn test_endpoints_is_not_error() {
        let result = DiscoveryResult::Endpoints(EndpointSet::new("d", "a", "p", "n"));
        assert!(!result.has_error());
        assert_eq!(result.outcome(), "endpoints");
        assert_eq!(DiscoveryResult::server_error().outcome(), "error");
    }
}
