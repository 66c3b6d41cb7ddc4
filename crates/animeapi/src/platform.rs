//! Platforms, media types and title identifiers accepted by AnimeAPI.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AnimeApiError;

/// A cataloging or tracking service participating in the relation mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    AniDb,
    AniList,
    AnimeNewsNetwork,
    AnimePlanet,
    AniSearch,
    Annict,
    Imdb,
    Kaize,
    Kitsu,
    Letterboxd,
    LiveChart,
    MyAnimeList,
    Nautiljon,
    Notify,
    OtakOtaku,
    Shikimori,
    Shoboi,
    SilverYasha,
    Simkl,
    TheMovieDb,
    TheTvDb,
    Trakt,
}

/// Shorthand names accepted in addition to the canonical keys.
const ALIASES: &[(&str, Platform)] = &[
    ("adb", Platform::AniDb),
    ("al", Platform::AniList),
    ("ann", Platform::AnimeNewsNetwork),
    ("ap", Platform::AnimePlanet),
    ("anipla", Platform::AnimePlanet),
    ("as", Platform::AniSearch),
    ("kz", Platform::Kaize),
    ("kt", Platform::Kitsu),
    ("lb", Platform::Letterboxd),
    ("lc", Platform::LiveChart),
    ("mal", Platform::MyAnimeList),
    ("nj", Platform::Nautiljon),
    ("notifymoe", Platform::Notify),
    ("nm", Platform::Notify),
    ("ot", Platform::OtakOtaku),
    ("sh", Platform::Shikimori),
    ("syoboi", Platform::Shoboi),
    ("shobocal", Platform::Shoboi),
    ("syobocal", Platform::Shoboi),
    ("dbti", Platform::SilverYasha),
    ("tmdb", Platform::TheMovieDb),
    ("tvdb", Platform::TheTvDb),
];

impl Platform {
    pub const ALL: &[Platform] = &[
        Self::AniDb,
        Self::AniList,
        Self::AnimeNewsNetwork,
        Self::AnimePlanet,
        Self::AniSearch,
        Self::Annict,
        Self::Imdb,
        Self::Kaize,
        Self::Kitsu,
        Self::Letterboxd,
        Self::LiveChart,
        Self::MyAnimeList,
        Self::Nautiljon,
        Self::Notify,
        Self::OtakOtaku,
        Self::Shikimori,
        Self::Shoboi,
        Self::SilverYasha,
        Self::Simkl,
        Self::TheMovieDb,
        Self::TheTvDb,
        Self::Trakt,
    ];

    /// Canonical key used in request paths.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AniDb => "anidb",
            Self::AniList => "anilist",
            Self::AnimeNewsNetwork => "animenewsnetwork",
            Self::AnimePlanet => "animeplanet",
            Self::AniSearch => "anisearch",
            Self::Annict => "annict",
            Self::Imdb => "imdb",
            Self::Kaize => "kaize",
            Self::Kitsu => "kitsu",
            Self::Letterboxd => "letterboxd",
            Self::LiveChart => "livechart",
            Self::MyAnimeList => "myanimelist",
            Self::Nautiljon => "nautiljon",
            Self::Notify => "notify",
            Self::OtakOtaku => "otakotaku",
            Self::Shikimori => "shikimori",
            Self::Shoboi => "shoboi",
            Self::SilverYasha => "silveryasha",
            Self::Simkl => "simkl",
            Self::TheMovieDb => "themoviedb",
            Self::TheTvDb => "thetvdb",
            Self::Trakt => "trakt",
        }
    }

    /// Platforms that only exist on the V3 API.
    pub fn requires_v3(self) -> bool {
        matches!(self, Self::Imdb | Self::TheMovieDb)
    }

    /// Platforms whose non-numeric identifiers are slugs resolvable through Kitsu.
    pub fn supports_slug_lookup(self) -> bool {
        matches!(self, Self::Kitsu)
    }

    /// Platforms addressed as `/{platform}/series/{id}`.
    pub fn uses_series_prefix(self) -> bool {
        matches!(self, Self::TheTvDb)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = AnimeApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == key)
            .or_else(|| {
                ALIASES
                    .iter()
                    .find(|(alias, _)| *alias == key)
                    .map(|(_, p)| *p)
            })
            .ok_or_else(|| AnimeApiError::InvalidParameter(format!("unknown platform {s:?}")))
    }
}

/// Media kind qualifier for platforms whose ID space is split by media type.
///
/// `Shows`/`Movies` belong to Trakt, `Movie`/`Tv` to TheMovieDB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Shows,
    Movies,
    Movie,
    Tv,
}

impl MediaType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Shows => "shows",
            Self::Movies => "movies",
            Self::Movie => "movie",
            Self::Tv => "tv",
        }
    }

    pub fn is_trakt(self) -> bool {
        matches!(self, Self::Shows | Self::Movies)
    }

    pub fn is_tmdb(self) -> bool {
        matches!(self, Self::Movie | Self::Tv)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = AnimeApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shows" | "show" => Ok(Self::Shows),
            "movies" => Ok(Self::Movies),
            "movie" => Ok(Self::Movie),
            "tv" => Ok(Self::Tv),
            _ => Err(AnimeApiError::InvalidParameter(format!(
                "unknown media type {s:?}"
            ))),
        }
    }
}

/// A raw title identifier as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TitleId {
    Numeric(u64),
    Text(String),
}

impl TitleId {
    /// Whether the identifier consists of ASCII digits only.
    pub fn is_numeric(&self) -> bool {
        match self {
            Self::Numeric(_) => true,
            Self::Text(s) => is_digits(s),
        }
    }
}

impl fmt::Display for TitleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for TitleId {
    fn from(id: u64) -> Self {
        Self::Numeric(id)
    }
}

impl From<u32> for TitleId {
    fn from(id: u32) -> Self {
        Self::Numeric(id.into())
    }
}

impl From<&str> for TitleId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

impl From<String> for TitleId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

pub(crate) fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
