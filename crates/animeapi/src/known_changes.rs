//! Server revisions this client depends on, and drift detection against them.

use std::fmt;

use reqwest::header::HeaderMap;
use serde::Serialize;

use crate::config::ClientConfig;

/// Unix timestamp of the server's last compatibility-relevant change.
pub const SERVER_UPDATED_HEADER: &str = "x-animeapi-server-updated";
/// Unix timestamp of the last dataset refresh.
pub const CONTENT_UPDATED_HEADER: &str = "x-animeapi-updated";
pub const VERSION_HEADER: &str = "x-animeapi-version";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Removed,
    Updated,
    Deprecated,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added => write!(f, "added"),
            Self::Removed => write!(f, "removed"),
            Self::Updated => write!(f, "updated"),
            Self::Deprecated => write!(f, "deprecated"),
        }
    }
}

/// A server-side change that older servers do not have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KnownChange {
    pub timestamp: i64,
    pub kind: ChangeKind,
    pub field: &'static str,
    pub message: &'static str,
}

/// Ascending by timestamp; several entries may share one revision.
pub static KNOWN_CHANGES: &[KnownChange] = &[
    KnownChange {
        timestamp: 1761762026,
        kind: ChangeKind::Added,
        field: "server",
        message: "`X-ANIMEAPI-VERSION`, `X-ANIMEAPI-UPDATED`, and `X-ANIMEAPI-SERVER-UPDATED` \
                  headers are now required by this library",
    },
    KnownChange {
        timestamp: 1761762026,
        kind: ChangeKind::Updated,
        field: "letterboxd",
        message: "Slug, alphanumeric ID (used for official API), and internal numeric ID are \
                  now allowed for lookup",
    },
    KnownChange {
        timestamp: 1761762026,
        kind: ChangeKind::Updated,
        field: "trakt",
        message: "Slug is allowed as lookup keyword on Trakt",
    },
    KnownChange {
        timestamp: 1761762026,
        kind: ChangeKind::Deprecated,
        field: "animeapi",
        message: "Platform-dedicated object and list endpoints were deprecated, no further update",
    },
];

/// Notice that the server predates the newest revision this client knows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advisory {
    pub server_revision: i64,
    pub client_revision: i64,
    pub changes: Vec<KnownChange>,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "server revision {} is older than {} expected by this client; missing changes:",
            self.server_revision, self.client_revision
        )?;
        for change in &self.changes {
            write!(f, "\n  [{}] {}: {}", change.kind, change.field, change.message)?;
        }
        Ok(())
    }
}

/// Newest revision in the embedded change table.
pub fn latest_revision() -> Option<i64> {
    latest_in(KNOWN_CHANGES)
}

/// Compare the server revision header against the embedded change table.
///
/// A missing or unparseable header means the revision is unknown, not outdated.
pub fn check_drift(headers: &HeaderMap) -> Option<Advisory> {
    check_drift_against(headers, KNOWN_CHANGES)
}

fn check_drift_against(headers: &HeaderMap, changes: &[KnownChange]) -> Option<Advisory> {
    let raw = headers.get(SERVER_UPDATED_HEADER)?;
    let server_revision = match raw.to_str().ok().and_then(|v| v.trim().parse::<i64>().ok()) {
        Some(rev) => rev,
        None => {
            tracing::debug!(value = ?raw, "Ignoring unparseable server revision header");
            return None;
        }
    };

    let client_revision = latest_in(changes)?;
    if server_revision >= client_revision {
        return None;
    }

    Some(Advisory {
        server_revision,
        client_revision,
        changes: changes
            .iter()
            .filter(|c| c.timestamp == client_revision)
            .copied()
            .collect(),
    })
}

fn latest_in(changes: &[KnownChange]) -> Option<i64> {
    changes.iter().map(|c| c.timestamp).max()
}

/// Drift advisory for a response, unless `config` opts out or targets the legacy host.
pub(crate) fn drift_for(config: &ClientConfig, headers: &HeaderMap) -> Option<Advisory> {
    if !config.warn_on_drift || config.is_legacy_host() {
        return None;
    }
    check_drift(headers)
}

/// Log response metadata and any drift advisory for a primary API response.
pub(crate) fn inspect_headers(config: &ClientConfig, headers: &HeaderMap) {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    tracing::debug!(
        version = header(VERSION_HEADER),
        updated = header(CONTENT_UPDATED_HEADER),
        server_updated = header(SERVER_UPDATED_HEADER),
        "AnimeAPI response metadata"
    );

    if let Some(advisory) = drift_for(config, headers) {
        tracing::warn!(
            server_revision = advisory.server_revision,
            client_revision = advisory.client_revision,
            "{advisory}"
        );
    }
}
