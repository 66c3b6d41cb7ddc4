use thiserror::Error;

/// Errors from the AnimeAPI client.
#[derive(Debug, Error)]
pub enum AnimeApiError {
    #[error("missing requirement: {0}")]
    MissingRequirement(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("invalid identifier for {platform}: {id:?}")]
    InvalidIdentifier { platform: String, id: String },

    #[error("unsupported version: {0}")]
    UnsupportedVersion(String),

    #[error("slug lookup failed (status {status}): {message}")]
    UpstreamLookup { status: u16, message: String },

    #[error("no entry found for slug {0:?}")]
    NotFound(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AnimeApiError>;
