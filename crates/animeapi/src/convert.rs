//! Payload to record conversion.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{AnimeApiError, Result};
use crate::types::{AnimeRelation, ApiStatus, ExtendedRelation, Heartbeat, Relation};

/// Fields only the extended relation shape carries.
const EXTENDED_MARKERS: &[&str] = &["data_hash", "themoviedb_season"];

pub fn parse_json(body: &str) -> Result<Value> {
    serde_json::from_str(body).map_err(|e| AnimeApiError::MalformedResponse(e.to_string()))
}

/// Convert one relation object, choosing the shape by which fields are present.
pub fn map_relation(payload: Value) -> Result<AnimeRelation> {
    let Value::Object(fields) = &payload else {
        return Err(AnimeApiError::MalformedResponse(format!(
            "expected a relation object, got {}",
            kind(&payload)
        )));
    };

    if EXTENDED_MARKERS.iter().any(|m| fields.contains_key(*m)) {
        from_value::<ExtendedRelation>(payload).map(AnimeRelation::Extended)
    } else {
        from_value::<Relation>(payload).map(AnimeRelation::Legacy)
    }
}

/// Convert a `/{platform}.json` mapping of platform ID to relation.
pub fn map_relation_dict(payload: Value) -> Result<HashMap<String, AnimeRelation>> {
    let entries = match payload {
        Value::Object(entries) => entries,
        other => {
            return Err(AnimeApiError::MalformedResponse(format!(
                "expected a relation mapping, got {}",
                kind(&other)
            )))
        }
    };

    entries
        .into_iter()
        .map(|(key, value)| {
            let relation = map_relation(value).map_err(|e| match e {
                AnimeApiError::MalformedResponse(msg) => {
                    AnimeApiError::MalformedResponse(format!("entry {key:?}: {msg}"))
                }
                other => other,
            })?;
            Ok((key, relation))
        })
        .collect()
}

/// Convert a `/{platform}().json` list of relations.
pub fn map_relation_list(payload: Value) -> Result<Vec<AnimeRelation>> {
    let entries = match payload {
        Value::Array(entries) => entries,
        other => {
            return Err(AnimeApiError::MalformedResponse(format!(
                "expected a relation list, got {}",
                kind(&other)
            )))
        }
    };
    entries.into_iter().map(map_relation).collect()
}

pub fn map_status(payload: Value) -> Result<ApiStatus> {
    from_value(payload)
}

pub fn map_heartbeat(payload: Value) -> Result<Heartbeat> {
    from_value(payload)
}

fn from_value<T: DeserializeOwned>(payload: Value) -> Result<T> {
    serde_json::from_value(payload).map_err(|e| AnimeApiError::MalformedResponse(e.to_string()))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::platform::{MediaType, Platform, TitleId};

    fn legacy_payload() -> Value {
        json!({
            "title": "Cowboy Bebop",
            "anidb": 23,
            "anilist": 1,
            "animeplanet": "cowboy-bebop",
            "anisearch": 1572,
            "annict": 360,
            "kaize": "cowboy-bebop",
            "kaize_id": 265,
            "kitsu": 1,
            "livechart": 3418,
            "myanimelist": 1,
            "nautiljon": "cowboy+bebop",
            "nautiljon_id": 28,
            "notify": "Tk3ccKimg",
            "otakotaku": 1149,
            "shikimori": 1,
            "shoboi": 538,
            "silveryasha": 2652,
            "trakt": 30857,
            "trakt_type": "shows",
            "trakt_season": 1
        })
    }

    #[test]
    fn test_legacy_variant() {
        let relation = map_relation(legacy_payload()).unwrap();
        let AnimeRelation::Legacy(r) = &relation else {
            panic!("expected legacy variant");
        };
        assert_eq!(r.title, "Cowboy Bebop");
        assert_eq!(r.myanimelist, Some(1));
        assert_eq!(r.trakt_type, Some(MediaType::Shows));
        assert_eq!(r.trakt_season, Some(1));
        assert_eq!(r.imdb, None);
        assert_eq!(r.themoviedb, None);
        assert!(relation.extended().is_none());
    }

    #[test]
    fn test_data_hash_selects_extended() {
        let mut payload = legacy_payload();
        payload["data_hash"] = json!("1c3d6b1e");
        payload["simkl"] = json!(37089);
        payload["letterboxd_slug"] = Value::Null;

        let relation = map_relation(payload).unwrap();
        let ext = relation.extended().expect("extended variant");
        assert_eq!(ext.data_hash.as_deref(), Some("1c3d6b1e"));
        assert_eq!(ext.simkl, Some(37089));
        assert_eq!(ext.letterboxd_slug, None);
        assert_eq!(relation.title(), "Cowboy Bebop");
        assert_eq!(relation.id(Platform::Simkl), Some(TitleId::Numeric(37089)));
    }

    #[test]
    fn test_tmdb_season_selects_extended() {
        let payload = json!({
            "title": "Cowboy Bebop",
            "themoviedb": 30991,
            "themoviedb_type": "tv",
            "themoviedb_season": 1
        });
        let relation = map_relation(payload).unwrap();
        let ext = relation.extended().expect("extended variant");
        assert_eq!(ext.themoviedb_type, Some(MediaType::Tv));
        assert_eq!(ext.themoviedb_season, Some(1));
        assert_eq!(ext.base.themoviedb, Some(30991));
    }

    #[test]
    fn test_id_lookup() {
        let relation = map_relation(legacy_payload()).unwrap();
        assert_eq!(relation.id(Platform::AniList), Some(TitleId::Numeric(1)));
        assert_eq!(
            relation.id(Platform::AnimePlanet),
            Some(TitleId::Text("cowboy-bebop".into()))
        );
        assert_eq!(relation.id(Platform::Imdb), None);
        // Extended-only platforms are absent on legacy records.
        assert_eq!(relation.id(Platform::Simkl), None);
    }

    #[test]
    fn test_unmatched_payload_is_malformed() {
        assert!(matches!(
            map_relation(json!({ "anilist": 1 })),
            Err(AnimeApiError::MalformedResponse(_))
        ));
        assert!(matches!(
            map_relation(json!([1, 2, 3])),
            Err(AnimeApiError::MalformedResponse(_))
        ));
        assert!(matches!(
            map_relation(json!({ "title": "x", "anilist": "one" })),
            Err(AnimeApiError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_dict_and_list() {
        let dict = map_relation_dict(json!({
            "1": legacy_payload(),
            "5": { "title": "Cowboy Bebop: Tengoku no Tobira", "anilist": 5, "data_hash": "ab" }
        }))
        .unwrap();
        assert_eq!(dict.len(), 2);
        assert!(dict["5"].extended().is_some());
        assert!(dict["1"].extended().is_none());

        let list = map_relation_list(json!([legacy_payload()])).unwrap();
        assert_eq!(list.len(), 1);

        match map_relation_dict(json!({ "7": { "anilist": 7 } })) {
            Err(AnimeApiError::MalformedResponse(msg)) => assert!(msg.contains("\"7\"")),
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
        assert!(map_relation_list(json!({})).is_err());
    }

    #[test]
    fn test_map_status() {
        let status = map_status(json!({
            "mainrepo": "https://github.com/nattadasu/animeApi",
            "updated": { "timestamp": 1760000000, "iso": "2025-10-09T08:53:20+00:00" },
            "contributors": ["nattadasu"],
            "sources": ["manami-project/anime-offline-database"],
            "license": "AGPL-3.0-only AND MIT AND CC0-1.0+",
            "website": "https://animeapi.my.id",
            "counts": { "total": 30000, "anilist": 20000, "myanimelist": 25000 },
            "endpoints": { "anidb": "/anidb/:media_id" }
        }))
        .unwrap();
        assert_eq!(status.counts.total, 30000);
        assert_eq!(status.counts.kitsu, None);
        assert_eq!(status.updated.timestamp, 1760000000);
        assert_eq!(status.endpoints["anidb"], "/anidb/:media_id");
    }

    #[test]
    fn test_map_status_missing_field() {
        assert!(matches!(
            map_status(json!({ "mainrepo": "x" })),
            Err(AnimeApiError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_map_heartbeat() {
        let hb = map_heartbeat(json!({
            "status": "OK",
            "code": 200,
            "response_time": "0.000s",
            "request_time": "0.000s",
            "request_epoch": 1760000000.25
        }))
        .unwrap();
        assert_eq!(hb.code, 200);
        assert_eq!(hb.status, "OK");

        assert!(matches!(
            map_heartbeat(json!({ "status": "OK", "code": "200" })),
            Err(AnimeApiError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_parse_json() {
        assert!(parse_json("{ not json").is_err());
        assert_eq!(parse_json("[]").unwrap(), json!([]));
    }
}
