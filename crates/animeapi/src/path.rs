//! Request path construction and validation.
//!
//! Every path the clients send is produced here, so the async and blocking
//! front ends share one set of rules.

use std::fmt;

use crate::config::ApiVersion;
use crate::error::{AnimeApiError, Result};
use crate::normalize::{normalize, Normalized};
use crate::platform::{is_digits, MediaType, Platform, TitleId};

const INDEX_PATH: &str = "/animeApi().json";

/// A single relation lookup as requested by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    pub platform: Platform,
    pub id: TitleId,
    pub media_type: Option<MediaType>,
    pub season: Option<u32>,
}

impl RequestSpec {
    pub fn new(platform: Platform, id: impl Into<TitleId>) -> Self {
        Self {
            platform,
            id: id.into(),
            media_type: None,
            season: None,
        }
    }

    pub fn with_media_type(mut self, media_type: MediaType) -> Self {
        self.media_type = Some(media_type);
        self
    }

    pub fn with_season(mut self, season: u32) -> Self {
        self.season = Some(season);
        self
    }
}

/// A fully resolved request path, relative to the API base URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalPath(String);

impl CanonicalPath {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of planning a lookup: either a finished path or a pending slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPlan {
    Ready(CanonicalPath),
    NeedsSlug(SlugRequest),
}

/// A validated lookup that still needs its slug turned into a numeric ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugRequest {
    spec: RequestSpec,
    version: ApiVersion,
    slug: String,
}

impl SlugRequest {
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Finish the path with the ID the slug resolved to.
    pub fn complete(self, id: u64) -> Result<CanonicalPath> {
        build_path(&self.spec, self.version, &id.to_string())
    }
}

/// Validate and normalize a lookup, building its path when no slug lookup is needed.
pub fn plan(spec: &RequestSpec, version: ApiVersion) -> Result<PathPlan> {
    validate(spec, version)?;
    match normalize(spec.platform, &spec.id)? {
        Normalized::Ready(id) => Ok(PathPlan::Ready(render(spec, &id))),
        Normalized::Resolve(slug) => Ok(PathPlan::NeedsSlug(SlugRequest {
            spec: spec.clone(),
            version,
            slug,
        })),
    }
}

/// Build the path for `spec` using an already normalized identifier.
pub fn build_path(spec: &RequestSpec, version: ApiVersion, id: &str) -> Result<CanonicalPath> {
    validate(spec, version)?;
    if id.is_empty() || (spec.platform == Platform::Trakt && !is_digits(id)) {
        return Err(AnimeApiError::InvalidIdentifier {
            platform: spec.platform.to_string(),
            id: id.to_string(),
        });
    }
    Ok(render(spec, id))
}

/// Path of the keyed bulk mapping for `platform`.
pub fn dict_path(platform: Platform, version: ApiVersion) -> Result<CanonicalPath> {
    check_version(platform, version)?;
    Ok(CanonicalPath(format!("/{platform}.json")))
}

/// Path of the bulk list for `platform`.
pub fn list_path(platform: Platform, version: ApiVersion) -> Result<CanonicalPath> {
    check_version(platform, version)?;
    Ok(CanonicalPath(format!("/{platform}().json")))
}

/// Path of the full list index, served on every version.
pub fn index_path() -> CanonicalPath {
    CanonicalPath(INDEX_PATH.to_string())
}

/// Service metadata endpoints, all V3-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaEndpoint {
    Status,
    Heartbeat,
    Updated,
}

impl MetaEndpoint {
    pub fn path(self, version: ApiVersion) -> Result<CanonicalPath> {
        let (path, name) = match self {
            Self::Status => ("/status", "Status"),
            Self::Heartbeat => ("/heartbeat", "Heartbeat"),
            Self::Updated => ("/updated", "Updated"),
        };
        if version == ApiVersion::V2 {
            return Err(AnimeApiError::UnsupportedVersion(format!(
                "{name} is only supported on V3"
            )));
        }
        Ok(CanonicalPath(path.to_string()))
    }
}

fn check_version(platform: Platform, version: ApiVersion) -> Result<()> {
    if platform.requires_v3() && version == ApiVersion::V2 {
        return Err(AnimeApiError::UnsupportedVersion(format!(
            "{platform} is not supported on V2"
        )));
    }
    Ok(())
}

fn validate(spec: &RequestSpec, version: ApiVersion) -> Result<()> {
    check_version(spec.platform, version)?;

    match spec.platform {
        Platform::Trakt => {
            let media_type = spec.media_type.ok_or_else(|| {
                AnimeApiError::MissingRequirement("Trakt requires a media type".into())
            })?;
            if !media_type.is_trakt() {
                return Err(AnimeApiError::InvalidParameter(format!(
                    "{media_type} is not a Trakt media type"
                )));
            }
            if spec.season == Some(0) {
                return Err(AnimeApiError::InvalidParameter(
                    "season 0 (specials) is not supported for Trakt".into(),
                ));
            }
        }
        Platform::TheMovieDb => {
            let media_type = spec.media_type.ok_or_else(|| {
                AnimeApiError::MissingRequirement("TheMovieDB requires a media type".into())
            })?;
            if !media_type.is_tmdb() {
                return Err(AnimeApiError::InvalidParameter(format!(
                    "{media_type} is not a TheMovieDB media type"
                )));
            }
        }
        _ => {}
    }
    Ok(())
}

/// Assemble the path. Callers must have run `validate` first.
fn render(spec: &RequestSpec, id: &str) -> CanonicalPath {
    let platform = spec.platform;
    let path = match (platform, spec.media_type) {
        (Platform::Trakt, Some(media_type)) => match (media_type, spec.season) {
            (MediaType::Shows, Some(season)) => {
                format!("/trakt/{media_type}/{id}/seasons/{season}")
            }
            _ => format!("/trakt/{media_type}/{id}"),
        },
        (Platform::TheMovieDb, Some(media_type)) => match (media_type, spec.season) {
            (MediaType::Tv, Some(season)) => {
                format!("/themoviedb/{media_type}/{id}/season/{season}")
            }
            _ => format!("/themoviedb/{media_type}/{id}"),
        },
        _ if platform.uses_series_prefix() => match spec.season {
            Some(season) => format!("/{platform}/series/{id}/seasons/{season}"),
            None => format!("/{platform}/series/{id}"),
        },
        _ => format!("/{platform}/{id}"),
    };
    CanonicalPath(path)
}
