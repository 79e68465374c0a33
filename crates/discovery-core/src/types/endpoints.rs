use serde::{Deserialize, Serialize};

/// The four hostnames a console is pointed at.
///
/// Serialized with the historical configuration key names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointSet {
    /// Discovery host
    #[serde(rename = "discovery")]
    pub discovery_host: String,

    /// API host
    #[serde(rename = "api")]
    pub api_host: String,

    /// Wii U portal host
    #[serde(rename = "wiiu")]
    pub portal_host: String,

    /// 3DS host
    #[serde(rename = "3ds")]
    pub n3ds_host: String,
}

impl EndpointSet {
    /// Create an endpoint set from its four hosts
    #[must_use]
    pub fn new(
        discovery_host: impl Into<String>,
        api_host: impl Into<String>,
        portal_host: impl Into<String>,
        n3ds_host: impl Into<String>,
    ) -> Self {
        Self {
            discovery_host: discovery_host.into(),
            api_host: api_host.into(),
            portal_host: portal_host.into(),
            n3ds_host: n3ds_host.into(),
        }
    }

    /// Names of the hosts that are empty, using their configuration keys
    #[must_use]
    pub fn missing_hosts(&self) -> Vec<&'static str> {
        [
            ("discovery", &self.discovery_host),
            ("api", &self.api_host),
            ("wiiu", &self.portal_host),
            ("3ds", &self.n3ds_host),
        ]
        .into_iter()
        .filter(|(_, host)| host.trim().is_empty())
        .map(|(key, _)| key)
        .collect()
    }

    /// Copy of this set with the discovery host replaced
    #[must_use]
    pub fn with_discovery_host(&self, host: impl Into<String>) -> Self {
        Self {
            discovery_host: host.into(),
            ..self.clone()
        }
    }
}
