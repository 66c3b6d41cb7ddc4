use std::collections::HashMap;

use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};

use crate::config::ClientConfig;
use crate::convert;
use crate::error::{AnimeApiError, Result};
use crate::kitsu;
use crate::known_changes::inspect_headers;
use crate::path::{self, CanonicalPath, MetaEndpoint, PathPlan, RequestSpec};
use crate::platform::Platform;
use crate::types::{AnimeRelation, ApiStatus, Heartbeat, Updated};

/// Async AnimeAPI client.
pub struct AnimeApiClient {
    config: ClientConfig,
    headers: HeaderMap,
    http: Client,
}

impl AnimeApiClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_http(config, Client::new())
    }

    /// Build a client around an HTTP client owned by the caller.
    pub fn with_http(config: ClientConfig, http: Client) -> Result<Self> {
        let headers = config.header_map()?;
        Ok(Self {
            config,
            headers,
            http,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn get(&self, operation: &str, path: &CanonicalPath, bulk: bool) -> Result<String> {
        tracing::debug!(operation, %path, "AnimeAPI request");

        let resp = self
            .http
            .get(self.config.endpoint(path.as_str()))
            .headers(self.headers.clone())
            .timeout(self.config.timeout())
            .send()
            .await?;

        let status = resp.status();
        if !accepts(status, bulk) {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(operation, status = status.as_u16(), "AnimeAPI error");
            return Err(AnimeApiError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        inspect_headers(&self.config, resp.headers());
        Ok(resp.text().await?)
    }

    /// Resolve the request path for a lookup, querying Kitsu for slugs.
    pub async fn resolve_path(&self, spec: &RequestSpec) -> Result<CanonicalPath> {
        match path::plan(spec, self.config.version())? {
            PathPlan::Ready(path) => Ok(path),
            PathPlan::NeedsSlug(req) => {
                let id = kitsu::resolve_slug(&self.http, req.slug(), self.config.timeout()).await?;
                req.complete(id)
            }
        }
    }

    /// Get the relations of one title.
    pub async fn get_anime_relations(&self, spec: &RequestSpec) -> Result<AnimeRelation> {
        let path = self.resolve_path(spec).await?;
        let body = self.get("relation", &path, false).await?;
        convert::map_relation(convert::parse_json(&body)?)
    }

    /// Get every relation on `platform`, keyed by that platform's ID.
    pub async fn get_dict_anime_relations(
        &self,
        platform: Platform,
    ) -> Result<HashMap<String, AnimeRelation>> {
        let path = path::dict_path(platform, self.config.version())?;
        let body = self.get("dict", &path, true).await?;
        convert::map_relation_dict(convert::parse_json(&body)?)
    }

    /// Get every relation on `platform` as a list.
    pub async fn get_list_anime_relations(&self, platform: Platform) -> Result<Vec<AnimeRelation>> {
        let path = path::list_path(platform, self.config.version())?;
        let body = self.get("list", &path, true).await?;
        convert::map_relation_list(convert::parse_json(&body)?)
    }

    /// Get the full index of titles known to the service.
    pub async fn get_list_index(&self) -> Result<Vec<AnimeRelation>> {
        let body = self.get("index", &path::index_path(), true).await?;
        convert::map_relation_list(convert::parse_json(&body)?)
    }

    pub async fn get_status(&self) -> Result<ApiStatus> {
        let path = MetaEndpoint::Status.path(self.config.version())?;
        let body = self.get("status", &path, false).await?;
        convert::map_status(convert::parse_json(&body)?)
    }

    pub async fn get_heartbeat(&self) -> Result<Heartbeat> {
        let path = MetaEndpoint::Heartbeat.path(self.config.version())?;
        let body = self.get("heartbeat", &path, false).await?;
        convert::map_heartbeat(convert::parse_json(&body)?)
    }

    /// Get the time the dataset was last refreshed.
    pub async fn get_updated_time(&self) -> Result<Updated> {
        let path = MetaEndpoint::Updated.path(self.config.version())?;
        let body = self.get("updated", &path, false).await?;
        Ok(Updated(body.trim().to_string()))
    }
}

/// Bulk dumps are served from a CDN that may answer with a redirect or 304.
pub(crate) fn accepts(status: StatusCode, bulk: bool) -> bool {
    status.is_success()
        || (bulk && matches!(status, StatusCode::FOUND | StatusCode::NOT_MODIFIED))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiVersion;
    use crate::platform::MediaType;

    fn legacy_client() -> AnimeApiClient {
        AnimeApiClient::new(ClientConfig::from(ApiVersion::V2)).unwrap()
    }

    #[test]
    fn test_accepts() {
        assert!(accepts(StatusCode::OK, false));
        assert!(!accepts(StatusCode::NOT_MODIFIED, false));
        assert!(accepts(StatusCode::NOT_MODIFIED, true));
        assert!(accepts(StatusCode::FOUND, true));
        assert!(!accepts(StatusCode::NOT_FOUND, true));
    }

    #[test]
    fn test_bad_header_config() {
        let mut config = ClientConfig::default();
        config.headers.insert("bad header".into(), "x".into());
        assert!(matches!(
            AnimeApiClient::new(config),
            Err(AnimeApiError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_v3_endpoints_rejected_on_legacy() {
        let client = legacy_client();
        assert!(matches!(
            client.get_status().await,
            Err(AnimeApiError::UnsupportedVersion(_))
        ));
        assert!(matches!(
            client.get_heartbeat().await,
            Err(AnimeApiError::UnsupportedVersion(_))
        ));
        assert!(matches!(
            client.get_updated_time().await,
            Err(AnimeApiError::UnsupportedVersion(_))
        ));
        assert!(matches!(
            client.get_dict_anime_relations(Platform::Imdb).await,
            Err(AnimeApiError::UnsupportedVersion(_))
        ));
        assert!(matches!(
            client.get_list_anime_relations(Platform::TheMovieDb).await,
            Err(AnimeApiError::UnsupportedVersion(_))
        ));
    }

    #[tokio::test]
    async fn test_validation_precedes_network() {
        let client = AnimeApiClient::new(ClientConfig::default()).unwrap();
        let missing = RequestSpec::new(Platform::Trakt, 1u64);
        assert!(matches!(
            client.get_anime_relations(&missing).await,
            Err(AnimeApiError::MissingRequirement(_))
        ));

        let specials = missing.with_media_type(MediaType::Shows).with_season(0);
        assert!(matches!(
            client.get_anime_relations(&specials).await,
            Err(AnimeApiError::InvalidParameter(_))
        ));
    }

    #[tokio::test]
    async fn test_resolve_path_without_slug() {
        let client = AnimeApiClient::new(ClientConfig::default()).unwrap();
        let spec = RequestSpec::new(Platform::Shikimori, "z5114");
        let path = client.resolve_path(&spec).await.unwrap();
        assert_eq!(path.as_str(), "/shikimori/5114");
    }
}
