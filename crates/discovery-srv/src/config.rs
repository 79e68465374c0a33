//! Server configuration, loaded once from YAML and validated before serving.

use discovery_core::EndpointSet;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::policy::{BanEntry, BanList, EndpointTable, GroupDefinitions, PolicyState, TokenKeys};
use crate::sync::{PolicyDomain, RefreshTask};
use crate::SrvError;

/// Name of the mandatory endpoint set used for ungrouped consoles.
pub const DEFAULT_ENDPOINTS: &str = "default";

/// Top-level configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server and policy options.
    pub options: Options,

    /// Endpoint sets by name; must contain `default`.
    pub endpoints: BTreeMap<String, EndpointSet>,
}

/// The `options` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Options {
    /// HTTP listen address (default: 0.0.0.0:8080).
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,

    /// Route the discovery handler is mounted on (default: /v1/endpoint).
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Take the discovery host from the endpoint set instead of the request.
    #[serde(default)]
    pub override_discovery: bool,

    /// How ban and group definition keys are stored.
    #[serde(default)]
    pub token_keys: TokenKeys,

    /// Maintenance flag, or a URL to poll it from.
    #[serde(default)]
    pub maintenance: PolicySource<bool>,

    /// Ban list, or a URL to poll it from.
    #[serde(default)]
    pub bans: PolicySource<HashMap<String, BanEntry>>,

    /// Group definitions, or a URL to poll them from.
    #[serde(default)]
    pub groupdefs: PolicySource<GroupDefinitions>,

    /// Poll intervals for remote sources.
    #[serde(default)]
    pub refresh: RefreshIntervals,

    /// Timeout for one policy fetch in seconds (default: 15).
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout: u64,

    /// Time allowed to answer one request in seconds (default: 15).
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

/// Where one policy domain comes from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PolicySource<T> {
    /// Polled from a URL
    Remote(Url),

    /// Given literally in the configuration
    Static(T),
}

impl<T: Default> Default for PolicySource<T> {
    fn default() -> Self {
        Self::Static(T::default())
    }
}

impl<T> PolicySource<T> {
    /// The URL to poll, for remote sources
    #[must_use]
    pub const fn remote_url(&self) -> Option<&Url> {
        match self {
            Self::Remote(url) => Some(url),
            Self::Static(_) => None,
        }
    }
}

impl<T: Clone + Default> PolicySource<T> {
    /// Value to serve until the first successful refresh
    #[must_use]
    pub fn initial_value(&self) -> T {
        match self {
            Self::Static(value) => value.clone(),
            Self::Remote(_) => T::default(),
        }
    }
}

/// Per-domain poll intervals in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RefreshIntervals {
    /// Maintenance poll interval (default: 60).
    #[serde(default = "default_refresh_interval")]
    pub maintenance: u64,

    /// Ban list poll interval (default: 60).
    #[serde(default = "default_refresh_interval")]
    pub bans: u64,

    /// Group definitions poll interval (default: 60).
    #[serde(default = "default_refresh_interval")]
    pub groupdefs: u64,
}

impl Default for RefreshIntervals {
    fn default() -> Self {
        Self {
            maintenance: default_refresh_interval(),
            bans: default_refresh_interval(),
            groupdefs: default_refresh_interval(),
        }
    }
}

impl ServerConfig {
    /// Load, parse and validate a YAML config file.
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SrvError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_yaml(&content)
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml(content: &str) -> crate::Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every shape constraint that can be checked before serving.
    pub fn validate(&self) -> crate::Result<()> {
        let default = self.endpoints.get(DEFAULT_ENDPOINTS).ok_or_else(|| {
            SrvError::Config(format!("endpoints.{DEFAULT_ENDPOINTS} is required"))
        })?;
        // Checked first so a broken default is reported as such.
        check_endpoint_set(DEFAULT_ENDPOINTS, default)?;
        for (name, set) in &self.endpoints {
            check_endpoint_set(name, set)?;
        }

        if !self.options.endpoint.starts_with('/') {
            return Err(SrvError::Config(format!(
                "options.endpoint must start with '/', got {:?}",
                self.options.endpoint
            )));
        }

        let refresh = &self.options.refresh;
        for (domain, secs) in [
            (PolicyDomain::Maintenance, refresh.maintenance),
            (PolicyDomain::Bans, refresh.bans),
            (PolicyDomain::GroupDefinitions, refresh.groupdefs),
        ] {
            if secs == 0 {
                return Err(SrvError::Config(format!(
                    "options.refresh.{} must be greater than zero",
                    domain.config_key()
                )));
            }
        }

        if self.options.fetch_timeout == 0 {
            return Err(SrvError::Config(
                "options.fetchTimeout must be greater than zero".into(),
            ));
        }

        if self.options.request_timeout == 0 {
            return Err(SrvError::Config(
                "options.requestTimeout must be greater than zero".into(),
            ));
        }

        Ok(())
    }

    /// Problems that do not stop the server but will fail or skip requests.
    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let keys = self.options.token_keys;

        if let PolicySource::Static(defs) = &self.options.groupdefs {
            let mut dangling: Vec<&str> = defs
                .values()
                .filter(|group| !self.endpoints.contains_key(group.as_str()))
                .map(String::as_str)
                .collect();
            dangling.sort_unstable();
            dangling.dedup();
            for group in dangling {
                warnings.push(format!(
                    "groupdefs reference group {group:?} which has no endpoint set"
                ));
            }

            let malformed = defs.keys().filter(|k| !keys.is_well_formed(k)).count();
            if malformed > 0 {
                warnings.push(format!(
                    "{malformed} groupdefs key(s) are not valid {keys} keys and will never match"
                ));
            }
        }

        if let PolicySource::Static(bans) = &self.options.bans {
            let malformed = bans.keys().filter(|k| !keys.is_well_formed(k)).count();
            if malformed > 0 {
                warnings.push(format!(
                    "{malformed} bans key(s) are not valid {keys} keys and will never match"
                ));
            }
        }

        warnings
    }

    /// The endpoint table served to consoles.
    pub fn endpoint_table(&self) -> crate::Result<EndpointTable> {
        let default = self.endpoints.get(DEFAULT_ENDPOINTS).cloned().ok_or_else(|| {
            SrvError::Config(format!("endpoints.{DEFAULT_ENDPOINTS} is required"))
        })?;
        Ok(EndpointTable {
            default,
            groups: self
                .endpoints
                .iter()
                .map(|(name, set)| (name.clone(), set.clone()))
                .collect(),
        })
    }

    /// The snapshot to serve at startup.
    ///
    /// Remotely sourced domains start empty until their first refresh.
    pub fn initial_state(&self) -> crate::Result<PolicyState> {
        let bans: BanList = self
            .options
            .bans
            .initial_value()
            .into_iter()
            .map(|(key, entry)| (key, entry.into_reason()))
            .collect();

        Ok(
            PolicyState::new(self.endpoint_table()?, self.options.token_keys)
                .with_maintenance(self.options.maintenance.initial_value())
                .with_bans(bans)
                .with_group_definitions(self.options.groupdefs.initial_value()),
        )
    }

    /// One refresh task per remotely sourced domain.
    #[must_use]
    pub fn refresh_tasks(&self) -> Vec<RefreshTask> {
        let options = &self.options;
        [
            (
                PolicyDomain::Maintenance,
                options.maintenance.remote_url(),
                options.refresh.maintenance,
            ),
            (
                PolicyDomain::Bans,
                options.bans.remote_url(),
                options.refresh.bans,
            ),
            (
                PolicyDomain::GroupDefinitions,
                options.groupdefs.remote_url(),
                options.refresh.groupdefs,
            ),
        ]
        .into_iter()
        .filter_map(|(domain, url, secs)| {
            url.map(|url| RefreshTask {
                domain,
                url: url.clone(),
                interval: Duration::from_secs(secs),
            })
        })
        .collect()
    }

    /// Policy fetch timeout.
    #[must_use]
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.options.fetch_timeout)
    }

    /// Per-request timeout applied by the HTTP server.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.options.request_timeout)
    }
}

fn check_endpoint_set(name: &str, set: &EndpointSet) -> crate::Result<()> {
    let missing = set.missing_hosts();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(SrvError::Config(format!(
            "endpoints.{name} is missing: {}",
            missing.join(", ")
        )))
    }
}

// Default value functions for serde.
fn default_listen() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_endpoint() -> String {
    String::from("/v1/endpoint")
}

const fn default_refresh_interval() -> u64 {
    60
}

const fn default_fetch_timeout() -> u64 {
    15
}

const fn default_request_timeout() -> u64 {
    15
}
