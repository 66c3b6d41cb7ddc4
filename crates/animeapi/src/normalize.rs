//! Per-platform identifier normalization.

use crate::error::{AnimeApiError, Result};
use crate::platform::{Platform, TitleId};

/// Outcome of normalizing a raw identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    /// The identifier is in the form the relation API expects.
    Ready(String),
    /// A slug that must be resolved to a numeric ID before a path can be built.
    Resolve(String),
}

/// Map a raw identifier to the canonical form for `platform`.
///
/// Never touches the network; slug inputs on platforms that support slug
/// lookup come back as [`Normalized::Resolve`].
pub fn normalize(platform: Platform, raw: &TitleId) -> Result<Normalized> {
    let id = raw.to_string();
    if id.trim().is_empty() {
        return Err(invalid(platform, &id));
    }

    match platform {
        Platform::Shikimori if !raw.is_numeric() => {
            // Shikimori URLs carry letter prefixes such as "z" or "anime".
            let digits: String = id.chars().filter(|c| c.is_ascii_digit()).collect();
            if digits.is_empty() {
                return Err(invalid(platform, &id));
            }
            Ok(Normalized::Ready(digits))
        }
        _ if platform.supports_slug_lookup() && !raw.is_numeric() => {
            Ok(Normalized::Resolve(id))
        }
        Platform::Trakt if !raw.is_numeric() => Err(invalid(platform, &id)),
        _ => Ok(Normalized::Ready(id)),
    }
}

fn invalid(platform: Platform, id: &str) -> AnimeApiError {
    AnimeApiError::InvalidIdentifier {
        platform: platform.to_string(),
        id: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_passthrough() {
        assert_eq!(
            normalize(Platform::AnimePlanet, &"cowboy-bebop".into()).unwrap(),
            Normalized::Ready("cowboy-bebop".into())
        );
        assert_eq!(
            normalize(Platform::MyAnimeList, &1u64.into()).unwrap(),
            Normalized::Ready("1".into())
        );
    }

    #[test]
    fn test_shikimori_strips_prefix() {
        assert_eq!(
            normalize(Platform::Shikimori, &"anime123".into()).unwrap(),
            Normalized::Ready("123".into())
        );
        assert_eq!(
            normalize(Platform::Shikimori, &"z5114".into()).unwrap(),
            Normalized::Ready("5114".into())
        );
    }

    #[test]
    fn test_shikimori_without_digits_is_invalid() {
        assert!(matches!(
            normalize(Platform::Shikimori, &"bebop".into()),
            Err(AnimeApiError::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn test_kitsu_slug_requests_resolution() {
        assert_eq!(
            normalize(Platform::Kitsu, &"my-slug".into()).unwrap(),
            Normalized::Resolve("my-slug".into())
        );
        assert_eq!(
            normalize(Platform::Kitsu, &"1".into()).unwrap(),
            Normalized::Ready("1".into())
        );
    }

    #[test]
    fn test_empty_is_invalid_everywhere() {
        for platform in Platform::ALL {
            assert!(
                matches!(
                    normalize(*platform, &"".into()),
                    Err(AnimeApiError::InvalidIdentifier { .. })
                ),
                "{platform} accepted an empty id"
            );
        }
        assert!(matches!(
            normalize(Platform::Kitsu, &"  ".into()),
            Err(AnimeApiError::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn test_slug_resolution_follows_capability() {
        for platform in Platform::ALL {
            let out = normalize(*platform, &"cowboy-bebop".into());
            if platform.supports_slug_lookup() {
                assert_eq!(out.unwrap(), Normalized::Resolve("cowboy-bebop".into()));
            } else {
                assert!(!matches!(out, Ok(Normalized::Resolve(_))));
            }
        }
    }

    #[test]
    fn test_trakt_requires_numeric() {
        assert!(matches!(
            normalize(Platform::Trakt, &"cowboy-bebop".into()),
            Err(AnimeApiError::InvalidIdentifier { .. })
        ));
        assert_eq!(
            normalize(Platform::Trakt, &30857u64.into()).unwrap(),
            Normalized::Ready("30857".into())
        );
    }
}
