use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AnimeApiError, Result};

/// Host of the V2 endpoint. It never sends revision headers.
pub const LEGACY_HOST: &str = "aniapi.nattadasu.my.id";

const DEFAULT_TIMEOUT_SECS: u64 = 100;

/// AnimeAPI generations with their fixed base URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    V2,
    V3,
}

impl ApiVersion {
    pub fn base_url(self) -> &'static str {
        match self {
            Self::V2 => "https://aniapi.nattadasu.my.id",
            Self::V3 => "https://animeapi.my.id",
        }
    }
}

/// Client settings shared by the async and blocking front ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: Url,
    pub timeout_secs: u64,
    pub headers: BTreeMap<String, String>,
    /// Log an advisory when the server runs older data than this client expects.
    pub warn_on_drift: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from(ApiVersion::V3)
    }
}

impl From<ApiVersion> for ClientConfig {
    fn from(version: ApiVersion) -> Self {
        Self {
            base_url: Url::parse(version.base_url()).expect("built-in base URL is valid"),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            headers: BTreeMap::new(),
            warn_on_drift: true,
        }
    }
}

impl ClientConfig {
    /// Build a config pointing at an arbitrary base URL (mirrors, self-hosted instances).
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AnimeApiError::Config(format!("invalid base URL {base_url:?}: {e}")))?;
        Ok(Self {
            base_url,
            ..Self::default()
        })
    }

    /// The API generation served at the configured base URL.
    ///
    /// Only the legacy host counts as V2; every other host is treated as V3.
    pub fn version(&self) -> ApiVersion {
        if self.is_legacy_host() {
            ApiVersion::V2
        } else {
            ApiVersion::V3
        }
    }

    pub fn is_legacy_host(&self) -> bool {
        self.base_url.host_str() == Some(LEGACY_HOST)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Join a request path onto the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.as_str().trim_end_matches('/'))
    }

    pub(crate) fn header_map(&self) -> Result<HeaderMap> {
        let mut map = HeaderMap::new();
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| AnimeApiError::Config(format!("invalid header name {name:?}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| AnimeApiError::Config(format!("invalid header value for {name}: {e}")))?;
            map.insert(name, value);
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_v3() {
        let config = ClientConfig::default();
        assert_eq!(config.version(), ApiVersion::V3);
        assert_eq!(config.timeout(), Duration::from_secs(100));
        assert!(config.warn_on_drift);
        assert!(!config.is_legacy_host());
    }

    #[test]
    fn test_legacy_host_is_v2() {
        let config = ClientConfig::from(ApiVersion::V2);
        assert_eq!(config.version(), ApiVersion::V2);
        assert!(config.is_legacy_host());
    }

    #[test]
    fn test_custom_host_is_v3() {
        let config = ClientConfig::with_base_url("http://localhost:8080").unwrap();
        assert_eq!(config.version(), ApiVersion::V3);
        assert_eq!(config.endpoint("/status"), "http://localhost:8080/status");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            ClientConfig::with_base_url("not a url"),
            Err(AnimeApiError::Config(_))
        ));
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let config = ClientConfig::default();
        assert_eq!(
            config.endpoint("/myanimelist/1"),
            "https://animeapi.my.id/myanimelist/1"
        );
    }

    #[test]
    fn test_header_map() {
        let mut config = ClientConfig::default();
        config
            .headers
            .insert("User-Agent".into(), "animeapi-rs".into());
        let map = config.header_map().unwrap();
        assert_eq!(map.get("user-agent").unwrap(), "animeapi-rs");

        config.headers.insert("bad header".into(), "x".into());
        assert!(matches!(config.header_map(), Err(AnimeApiError::Config(_))));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = ClientConfig::from(ApiVersion::V2);
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: ClientConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.version(), ApiVersion::V2);
        assert_eq!(deserialized.timeout_secs, config.timeout_secs);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ClientConfig = toml::from_str("warn_on_drift = false").unwrap();
        assert!(!config.warn_on_drift);
        assert_eq!(config.version(), ApiVersion::V3);
    }
}
