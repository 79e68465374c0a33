use serde::{Deserialize, Serialize};

/// Client and title context sent in the `X-Nintendo-Parampack` header.
///
/// Every field falls back to zero or empty when the pack omits it or
/// carries an unparseable value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamPack {
    /// Title identifier, kept verbatim (leading zeros are significant)
    #[serde(default)]
    pub title_id: String,

    /// Title access key, kept verbatim
    #[serde(default)]
    pub access_key: String,

    /// Platform identifier
    #[serde(default)]
    pub platform_id: u32,

    /// Console region
    #[serde(default)]
    pub region_id: u32,

    /// System language
    #[serde(default)]
    pub language_id: u32,

    /// System country
    #[serde(default)]
    pub country_id: u32,

    /// System area
    #[serde(default)]
    pub area_id: u32,

    /// Parental control: network restriction
    #[serde(default)]
    pub network_restriction: u32,

    /// Parental control: friend restriction
    #[serde(default)]
    pub friend_restriction: u32,

    /// Parental control: rating restriction
    #[serde(default)]
    pub rating_restriction: u32,

    /// Rating organization in effect
    #[serde(default)]
    pub rating_organization: u32,

    /// Transferable console identifier, kept verbatim
    #[serde(default)]
    pub transferable_id: String,

    /// IANA timezone name
    #[serde(default)]
    pub tz_name: String,

    /// Offset from UTC in seconds
    #[serde(default)]
    pub utc_offset: i64,

    /// Remaster version of the running title
    #[serde(default)]
    pub remaster_version: u32,
}

impl ParamPack {
    /// Assign `value` to the field named by `key`.
    ///
    /// Returns false for unrecognised keys, leaving the pack untouched.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        match key {
            "title_id" => self.title_id = value.to_string(),
            "access_key" => self.access_key = value.to_string(),
            "platform_id" => self.platform_id = numeric(value),
            "region_id" => self.region_id = numeric(value),
            "language_id" => self.language_id = numeric(value),
            "country_id" => self.country_id = numeric(value),
            "area_id" => self.area_id = numeric(value),
            "network_restriction" => self.network_restriction = numeric(value),
            "friend_restriction" => self.friend_restriction = numeric(value),
            "rating_restriction" => self.rating_restriction = numeric(value),
            "rating_organization" => self.rating_organization = numeric(value),
            "transferable_id" => self.transferable_id = value.to_string(),
            "tz_name" => self.tz_name = value.to_string(),
            "utc_offset" => self.utc_offset = numeric(value),
            "remaster_version" => self.remaster_version = numeric(value),
            _ => return false,
        }
        true
    }

    /// Returns true if `key` names a parameter pack field
    #[must_use]
    pub fn is_known_key(key: &str) -> bool {
        KNOWN_KEYS.contains(&key)
    }
}

/// Field names recognised in a parameter pack.
pub const KNOWN_KEYS: [&str; 15] = [
    "title_id",
    "access_key",
    "platform_id",
    "region_id",
    "language_id",
    "country_id",
    "area_id",
    "network_restriction",
    "friend_restriction",
    "rating_restriction",
    "rating_organization",
    "transferable_id",
    "tz_name",
    "utc_offset",
    "remaster_version",
];

fn numeric<T: std::str::FromStr + Default>(value: &str) -> T {
    value.parse().unwrap_or_default()
}
