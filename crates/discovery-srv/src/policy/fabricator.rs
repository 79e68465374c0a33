//! Fixed-precedence evaluation of a discovery request.
//!
//! Order: maintenance, then ban, then endpoint resolution. The first that
//! applies decides the result.

use discovery_core::{DiscoveryResult, ServiceToken};
use tracing::error;

use super::bans::is_banned;
use super::groups::resolve;
use super::state::PolicyState;

/// Turns a decoded request and a policy snapshot into a [`DiscoveryResult`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Fabricator {
    override_discovery: bool,
}

impl Fabricator {
    /// Create a fabricator.
    ///
    /// With `override_discovery` the discovery host comes from the endpoint
    /// set instead of the request.
    #[must_use]
    pub const fn new(override_discovery: bool) -> Self {
        Self { override_discovery }
    }

    /// Evaluate one request against `state`
    pub fn evaluate(
        &self,
        token: &ServiceToken,
        request_host: &str,
        state: &PolicyState,
    ) -> DiscoveryResult {
        if state.maintenance {
            return DiscoveryResult::maintenance();
        }

        // Ban and group keys are never consulted for a fallback identity.
        let eligible = token.is_ban_check_eligible();

        if eligible {
            if let Some(reason) = is_banned(token.raw(), state) {
                return DiscoveryResult::banned(reason);
            }
        }

        let fingerprint = if eligible { token.fingerprint() } else { None };
        match resolve(fingerprint, self.override_discovery, request_host, state) {
            Ok(endpoints) => DiscoveryResult::Endpoints(endpoints),
            Err(e) => {
                error!(error = %e, "failed to resolve endpoints");
                DiscoveryResult::server_error()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::keys::TokenKeys;
    use crate::policy::state::{BanList, EndpointTable, GroupDefinitions};
    use discovery_core::credentials::read_service_token;
    use discovery_core::{EndpointSet, ERROR_SUBCODE_BANNED, ERROR_SUBCODE_MAINTENANCE};

    // base64("console-one")
    const TOKEN: &str = "Y29uc29sZS1vbmU=";

    fn table() -> EndpointTable {
        EndpointTable::new(EndpointSet::new("disc", "api", "portal", "n3ds")).with_group(
            "beta",
            EndpointSet::new("disc.beta", "api.beta", "portal.beta", "n3ds.beta"),
        )
    }

    fn banned_state() -> PolicyState {
        let mut bans = BanList::new();
        bans.insert(TOKEN.into(), "no cheating".into());
        PolicyState::new(table(), TokenKeys::Plaintext).with_bans(bans)
    }

    #[test]
    fn test_maintenance_beats_ban() {
        let state = banned_state().with_maintenance(true);
        let result = Fabricator::new(false).evaluate(&read_service_token(TOKEN), "host", &state);
        match result {
            DiscoveryResult::Error { code, error_code, message } => {
                assert_eq!(code, 400);
                assert_eq!(error_code, ERROR_SUBCODE_MAINTENANCE);
                assert_eq!(message, "SERVICE_MAINTENANCE");
            }
            DiscoveryResult::Endpoints(_) => panic!("expected maintenance"),
        }
    }

    #[test]
    fn test_ban_reason_returned() {
        let state = banned_state();
        let result = Fabricator::new(false).evaluate(&read_service_token(TOKEN), "host", &state);
        assert_eq!(result, DiscoveryResult::banned("no cheating"));
        if let DiscoveryResult::Error { error_code, .. } = result {
            assert_eq!(error_code, ERROR_SUBCODE_BANNED);
        }
    }

    #[test]
    fn test_undecodable_token_skips_ban_check() {
        let mut bans = BanList::new();
        bans.insert("not-base64!".into(), "should never match".into());
        let state = PolicyState::new(table(), TokenKeys::Plaintext).with_bans(bans);

        let result =
            Fabricator::new(false).evaluate(&read_service_token("not-base64!"), "host", &state);
        assert_eq!(
            result,
            DiscoveryResult::Endpoints(EndpointSet::new("host", "api", "portal", "n3ds"))
        );
    }

    #[test]
    fn test_group_endpoints() {
        let token = read_service_token(TOKEN);
        let mut defs = GroupDefinitions::new();
        defs.insert(token.fingerprint().unwrap().to_string(), "beta".into());
        let state = PolicyState::new(table(), TokenKeys::Plaintext).with_group_definitions(defs);

        let result = Fabricator::new(false).evaluate(&token, "example.com", &state);
        assert_eq!(
            result,
            DiscoveryResult::Endpoints(EndpointSet::new(
                "example.com",
                "api.beta",
                "portal.beta",
                "n3ds.beta"
            ))
        );
    }

    #[test]
    fn test_dangling_group_gives_server_error() {
        let token = read_service_token(TOKEN);
        let mut defs = GroupDefinitions::new();
        defs.insert(token.fingerprint().unwrap().to_string(), "gamma".into());
        let state = PolicyState::new(table(), TokenKeys::Plaintext).with_group_definitions(defs);

        let result = Fabricator::new(true).evaluate(&token, "example.com", &state);
        assert_eq!(result, DiscoveryResult::server_error());
    }
}
