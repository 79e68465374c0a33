//! Endpoint resolution for grouped and ungrouped consoles.

use discovery_core::{EndpointSet, Fingerprint};

use super::state::PolicyState;
use crate::SrvError;

/// Pick the endpoint set for a console.
///
/// Group definitions are probed with the fingerprint; the first match wins
/// and no match means the default set. Unless `override_discovery` is set,
/// the discovery host is always the host the console used to reach us.
///
/// # Errors
///
/// Returns [`SrvError::UnknownGroup`] if the matched group has no endpoint
/// set. The caller must not fall back to the default endpoints.
pub fn resolve(
    fingerprint: Option<&Fingerprint>,
    override_discovery: bool,
    request_host: &str,
    state: &PolicyState,
) -> crate::Result<EndpointSet> {
    let group = fingerprint.and_then(|fp| {
        state
            .token_keys
            .find(fp.as_str(), &state.group_definitions)
            .map(|(_, group)| group.as_str())
    });

    let endpoints = match group {
        Some(name) => state
            .endpoints
            .group(name)
            .ok_or_else(|| SrvError::UnknownGroup(name.to_string()))?,
        None => &state.endpoints.default,
    };

    if override_discovery {
        Ok(endpoints.clone())
    } else {
        Ok(endpoints.with_discovery_host(request_host))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::keys::TokenKeys;
    use crate::policy::state::{EndpointTable, GroupDefinitions};

    const COST: u32 = 4;

    fn beta_fingerprint() -> Fingerprint {
        Fingerprint::from_bytes(b"beta-console")
    }

    fn state(keys: TokenKeys, definitions: GroupDefinitions) -> PolicyState {
        let table = EndpointTable::new(EndpointSet::new(
            "discovery.example.net",
            "api.example.net",
            "portal.example.net",
            "n3ds.example.net",
        ))
        .with_group(
            "beta",
            EndpointSet::new(
                "discovery.beta.example.net",
                "api.beta.example.net",
                "portal.beta.example.net",
                "n3ds.beta.example.net",
            ),
        );
        PolicyState::new(table, keys).with_group_definitions(definitions)
    }

    fn beta_state() -> PolicyState {
        let mut defs = GroupDefinitions::new();
        defs.insert(
            TokenKeys::Bcrypt.make_key(beta_fingerprint().as_str(), COST).unwrap(),
            "beta".into(),
        );
        state(TokenKeys::Bcrypt, defs)
    }

    #[test]
    fn test_group_uses_request_host() {
        let state = beta_state();
        let fp = beta_fingerprint();
        let endpoints = resolve(Some(&fp), false, "example.com", &state).unwrap();
        assert_eq!(endpoints.discovery_host, "example.com");
        assert_eq!(endpoints.api_host, "api.beta.example.net");
        assert_eq!(endpoints.portal_host, "portal.beta.example.net");
        assert_eq!(endpoints.n3ds_host, "n3ds.beta.example.net");
    }

    #[test]
    fn test_group_with_discovery_override() {
        let state = beta_state();
        let fp = beta_fingerprint();
        let endpoints = resolve(Some(&fp), true, "example.com", &state).unwrap();
        assert_eq!(endpoints.discovery_host, "discovery.beta.example.net");
        assert_eq!(endpoints.api_host, "api.beta.example.net");
    }

    #[test]
    fn test_unmatched_token_gets_defaults() {
        let state = beta_state();
        let fp = Fingerprint::from_bytes(b"someone-else");
        let endpoints = resolve(Some(&fp), false, "example.com", &state).unwrap();
        assert_eq!(
            endpoints,
            EndpointSet::new(
                "example.com",
                "api.example.net",
                "portal.example.net",
                "n3ds.example.net"
            )
        );
    }

    #[test]
    fn test_no_fingerprint_gets_defaults() {
        let state = beta_state();
        let endpoints = resolve(None, true, "example.com", &state).unwrap();
        assert_eq!(endpoints.discovery_host, "discovery.example.net");
        assert_eq!(endpoints.api_host, "api.example.net");
    }

    #[test]
    fn test_dangling_group_is_an_error() {
        let fp = beta_fingerprint();
        let mut defs = GroupDefinitions::new();
        defs.insert(fp.as_str().to_string(), "gamma".into());
        let state = state(TokenKeys::Plaintext, defs);

        let err = resolve(Some(&fp), false, "example.com", &state).unwrap_err();
        assert!(matches!(err, SrvError::UnknownGroup(ref name) if name == "gamma"));
    }
}
