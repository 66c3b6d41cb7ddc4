//! Kitsu slug resolution.
//!
//! The relation API only understands numeric Kitsu IDs, so slugs are looked
//! up against Kitsu's own JSON:API endpoint first.

use std::time::Duration;

use serde::Deserialize;

use crate::error::{AnimeApiError, Result};

const SLUG_URL: &str = "https://kitsu.io/api/edge/anime";
const JSON_API: &str = "application/vnd.api+json";

#[derive(Debug, Deserialize)]
struct JsonApiListResponse {
    data: Vec<JsonApiResource>,
}

#[derive(Debug, Deserialize)]
struct JsonApiResource {
    id: String,
}

/// Resolve a Kitsu slug to its numeric anime ID.
pub async fn resolve_slug(http: &reqwest::Client, slug: &str, timeout: Duration) -> Result<u64> {
    tracing::debug!(slug, "Resolving Kitsu slug");

    let resp = http
        .get(SLUG_URL)
        .header("Accept", JSON_API)
        .query(&[("filter[slug]", slug)])
        .timeout(timeout)
        .send()
        .await?;

    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        tracing::warn!(slug, status = status.as_u16(), "Kitsu slug lookup failed");
        return Err(AnimeApiError::UpstreamLookup {
            status: status.as_u16(),
            message: body,
        });
    }
    parse_slug_response(slug, &body)
}

/// Blocking counterpart of [`resolve_slug`].
pub fn resolve_slug_blocking(
    http: &reqwest::blocking::Client,
    slug: &str,
    timeout: Duration,
) -> Result<u64> {
    tracing::debug!(slug, "Resolving Kitsu slug");

    let resp = http
        .get(SLUG_URL)
        .header("Accept", JSON_API)
        .query(&[("filter[slug]", slug)])
        .timeout(timeout)
        .send()?;

    let status = resp.status();
    let body = resp.text()?;
    if !status.is_success() {
        tracing::warn!(slug, status = status.as_u16(), "Kitsu slug lookup failed");
        return Err(AnimeApiError::UpstreamLookup {
            status: status.as_u16(),
            message: body,
        });
    }
    parse_slug_response(slug, &body)
}

/// Pick the first entry's ID out of a slug filter response.
fn parse_slug_response(slug: &str, body: &str) -> Result<u64> {
    let resp: JsonApiListResponse = serde_json::from_str(body)
        .map_err(|e| AnimeApiError::MalformedResponse(format!("Kitsu slug response: {e}")))?;

    let first = resp
        .data
        .first()
        .ok_or_else(|| AnimeApiError::NotFound(slug.to_string()))?;

    first.id.parse().map_err(|_| {
        AnimeApiError::MalformedResponse(format!("Kitsu returned non-numeric id {:?}", first.id))
    })
}
