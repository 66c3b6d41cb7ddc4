//! Blocking AnimeAPI client.
//!
//! Same operations as [`crate::AnimeApiClient`], backed by
//! `reqwest::blocking`. Do not construct or drop it inside an async runtime.

use std::collections::HashMap;

use reqwest::blocking::Client;
use reqwest::header::HeaderMap;

use crate::client::accepts;
use crate::config::ClientConfig;
use crate::convert;
use crate::error::{AnimeApiError, Result};
use crate::kitsu;
use crate::known_changes::inspect_headers;
use crate::path::{self, CanonicalPath, MetaEndpoint, PathPlan, RequestSpec};
use crate::platform::Platform;
use crate::types::{AnimeRelation, ApiStatus, Heartbeat, Updated};

pub struct AnimeApiClient {
    config: ClientConfig,
    headers: HeaderMap,
    http: Client,
}

impl AnimeApiClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_http(config, Client::new())
    }

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

    fn get(&self, operation: &str, path: &CanonicalPath, bulk: bool) -> Result<String> {
        tracing::debug!(operation, %path, "AnimeAPI request");

        let resp = self
            .http
            .get(self.config.endpoint(path.as_str()))
            .headers(self.headers.clone())
            .timeout(self.config.timeout())
            .send()?;

        let status = resp.status();
        if !accepts(status, bulk) {
            let body = resp.text().unwrap_or_default();
            tracing::warn!(operation, status = status.as_u16(), "AnimeAPI error");
            return Err(AnimeApiError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        inspect_headers(&self.config, resp.headers());
        Ok(resp.text()?)
    }

    pub fn resolve_path(&self, spec: &RequestSpec) -> Result<CanonicalPath> {
        match path::plan(spec, self.config.version())? {
            PathPlan::Ready(path) => Ok(path),
            PathPlan::NeedsSlug(req) => {
                let id = kitsu::resolve_slug_blocking(&self.http, req.slug(), self.config.timeout())?;
                req.complete(id)
            }
        }
    }

    pub fn get_anime_relations(&self, spec: &RequestSpec) -> Result<AnimeRelation> {
        let path = self.resolve_path(spec)?;
        let body = self.get("relation", &path, false)?;
        convert::map_relation(convert::parse_json(&body)?)
    }

    pub fn get_dict_anime_relations(
        &self,
        platform: Platform,
    ) -> Result<HashMap<String, AnimeRelation>> {
        let path = path::dict_path(platform, self.config.version())?;
        let body = self.get("dict", &path, true)?;
        convert::map_relation_dict(convert::parse_json(&body)?)
    }

    pub fn get_list_anime_relations(&self, platform: Platform) -> Result<Vec<AnimeRelation>> {
        let path = path::list_path(platform, self.config.version())?;
        let body = self.get("list", &path, true)?;
        convert::map_relation_list(convert::parse_json(&body)?)
    }

    pub fn get_list_index(&self) -> Result<Vec<AnimeRelation>> {
        let body = self.get("index", &path::index_path(), true)?;
        convert::map_relation_list(convert::parse_json(&body)?)
    }

    pub fn get_status(&self) -> Result<ApiStatus> {
        let path = MetaEndpoint::Status.path(self.config.version())?;
        let body = self.get("status", &path, false)?;
        convert::map_status(convert::parse_json(&body)?)
    }

    pub fn get_heartbeat(&self) -> Result<Heartbeat> {
        let path = MetaEndpoint::Heartbeat.path(self.config.version())?;
        let body = self.get("heartbeat", &path, false)?;
        convert::map_heartbeat(convert::parse_json(&body)?)
    }

    pub fn get_updated_time(&self) -> Result<Updated> {
        let path = MetaEndpoint::Updated.path(self.config.version())?;
        let body = self.get("updated", &path, false)?;
        Ok(Updated(body.trim().to_string()))
    }
}
