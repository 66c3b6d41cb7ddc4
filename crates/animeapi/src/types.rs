use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AnimeApiError, Result};
use crate::platform::{MediaType, Platform, TitleId};

// ── Relations ────────────────────────────────────────────────────

/// Cross-platform identifiers for one title, as served by every API revision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub title: String,
    /// AniDB ID, without the prefix.
    pub anidb: Option<u64>,
    pub anilist: Option<u64>,
    /// Anime-Planet slug.
    pub animeplanet: Option<String>,
    pub anisearch: Option<u64>,
    pub annict: Option<u64>,
    pub imdb: Option<String>,
    /// Kaize slug.
    pub kaize: Option<String>,
    /// Kaize internal numeric ID.
    pub kaize_id: Option<u64>,
    pub kitsu: Option<u64>,
    pub livechart: Option<u64>,
    pub myanimelist: Option<u64>,
    /// Nautiljon slug in plus format.
    pub nautiljon: Option<String>,
    pub nautiljon_id: Option<u64>,
    /// Notify.moe base64 ID.
    pub notify: Option<String>,
    pub otakotaku: Option<u64>,
    pub shoboi: Option<u64>,
    /// Shikimori ID, without the prefix.
    pub shikimori: Option<u64>,
    pub silveryasha: Option<u64>,
    pub themoviedb: Option<u64>,
    pub trakt: Option<u64>,
    /// `None` for movies.
    pub trakt_season: Option<u32>,
    pub trakt_type: Option<MediaType>,
}

/// Relation record from newer servers, with extra platforms and a content hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtendedRelation {
    #[serde(flatten)]
    pub base: Relation,
    pub animenewsnetwork: Option<u64>,
    pub letterboxd_lid: Option<String>,
    pub letterboxd_slug: Option<String>,
    pub letterboxd_uid: Option<u64>,
    pub simkl: Option<u64>,
    pub themoviedb_type: Option<MediaType>,
    pub themoviedb_season: Option<u32>,
    pub thetvdb: Option<u64>,
    pub thetvdb_season: Option<u32>,
    pub data_hash: Option<String>,
}

/// A relation lookup result in whichever shape the server sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnimeRelation {
    Legacy(Relation),
    Extended(ExtendedRelation),
}

impl AnimeRelation {
    /// Fields shared by both shapes.
    pub fn relation(&self) -> &Relation {
        match self {
            Self::Legacy(r) => r,
            Self::Extended(r) => &r.base,
        }
    }

    pub fn extended(&self) -> Option<&ExtendedRelation> {
        match self {
            Self::Legacy(_) => None,
            Self::Extended(r) => Some(r),
        }
    }

    pub fn title(&self) -> &str {
        &self.relation().title
    }

    /// The identifier this title has on `platform`, if known.
    pub fn id(&self, platform: Platform) -> Option<TitleId> {
        let r = self.relation();
        let ext = self.extended();
        let num = |v: Option<u64>| v.map(TitleId::Numeric);
        let text = |v: &Option<String>| v.clone().map(TitleId::Text);

        match platform {
            Platform::AniDb => num(r.anidb),
            Platform::AniList => num(r.anilist),
            Platform::AnimeNewsNetwork => num(ext.and_then(|e| e.animenewsnetwork)),
            Platform::AnimePlanet => text(&r.animeplanet),
            Platform::AniSearch => num(r.anisearch),
            Platform::Annict => num(r.annict),
            Platform::Imdb => text(&r.imdb),
            Platform::Kaize => text(&r.kaize),
            Platform::Kitsu => num(r.kitsu),
            Platform::Letterboxd => ext.and_then(|e| text(&e.letterboxd_slug)),
            Platform::LiveChart => num(r.livechart),
            Platform::MyAnimeList => num(r.myanimelist),
            Platform::Nautiljon => text(&r.nautiljon),
            Platform::Notify => text(&r.notify),
            Platform::OtakOtaku => num(r.otakotaku),
            Platform::Shikimori => num(r.shikimori),
            Platform::Shoboi => num(r.shoboi),
            Platform::SilverYasha => num(r.silveryasha),
            Platform::Simkl => num(ext.and_then(|e| e.simkl)),
            Platform::TheMovieDb => num(r.themoviedb),
            Platform::TheTvDb => num(ext.and_then(|e| e.thetvdb)),
            Platform::Trakt => num(r.trakt),
        }
    }
}

// ── Service metadata ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatedInfo {
    pub timestamp: i64,
    pub iso: String,
}

impl UpdatedInfo {
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }
}

/// Per-platform entry counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Counts {
    pub total: u64,
    pub anidb: Option<u64>,
    pub anilist: Option<u64>,
    pub animenewsnetwork: Option<u64>,
    pub animeplanet: Option<u64>,
    pub anisearch: Option<u64>,
    pub annict: Option<u64>,
    pub imdb: Option<u64>,
    pub kaize: Option<u64>,
    pub kitsu: Option<u64>,
    pub letterboxd: Option<u64>,
    pub livechart: Option<u64>,
    pub myanimelist: Option<u64>,
    pub nautiljon: Option<u64>,
    pub notify: Option<u64>,
    pub otakotaku: Option<u64>,
    pub shikimori: Option<u64>,
    pub shoboi: Option<u64>,
    pub silveryasha: Option<u64>,
    pub simkl: Option<u64>,
    pub themoviedb: Option<u64>,
    pub thetvdb: Option<u64>,
    pub trakt: Option<u64>,
}

/// Response of `/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiStatus {
    pub mainrepo: String,
    pub updated: UpdatedInfo,
    pub contributors: Vec<String>,
    pub sources: Vec<String>,
    pub license: String,
    pub website: String,
    pub counts: Counts,
    pub endpoints: BTreeMap<String, String>,
}

/// Response of `/heartbeat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heartbeat {
    pub status: String,
    pub code: u16,
    pub response_time: String,
    pub request_time: String,
    pub request_epoch: f64,
}

impl Heartbeat {
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_micros((self.request_epoch * 1e6).round() as i64)
    }
}

/// Plain-text body of `/updated`, e.g. `Updated on 10/18/2026 04:12:55 UTC`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Updated(pub String);

impl Updated {
    pub fn message(&self) -> &str {
        &self.0
    }

    pub fn datetime(&self) -> Result<DateTime<Utc>> {
        NaiveDateTime::parse_from_str(self.0.trim(), "Updated on %m/%d/%Y %H:%M:%S UTC")
            .map(|t| t.and_utc())
            .map_err(|e| AnimeApiError::MalformedResponse(format!("{:?}: {e}", self.0)))
    }
}

impl std::fmt::Display for Updated {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
