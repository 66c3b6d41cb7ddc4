//! Client for AnimeAPI, a service that maps an anime's ID on one
//! cataloging platform to its IDs on every other platform it knows.
//!
//! Path building, identifier normalization, response mapping and version
//! drift detection are plain functions shared by the async
//! [`AnimeApiClient`] and the [`blocking::AnimeApiClient`].

pub mod blocking;
pub mod client;
pub mod config;
pub mod convert;
pub mod error;
pub mod kitsu;
pub mod known_changes;
pub mod normalize;
pub mod path;
pub mod platform;
pub mod types;

pub use client::AnimeApiClient;
pub use config::{ApiVersion, ClientConfig};
pub use error::{AnimeApiError, Result};
pub use known_changes::{check_drift, Advisory, KnownChange, KNOWN_CHANGES};
pub use path::{CanonicalPath, PathPlan, RequestSpec};
pub use platform::{MediaType, Platform, TitleId};
pub use types::{AnimeRelation, ApiStatus, ExtendedRelation, Heartbeat, Relation, Updated};
