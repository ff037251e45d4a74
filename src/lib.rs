//! Reddit API client: typed decoding of the `{kind, data}` envelope, a
//! selection queue of targets, listings, deduplicated polling streams and
//! POST actions.

pub mod auth;
pub mod client;
pub mod config;
pub mod models;
pub mod operations;

pub use client::{RedditClient, RedditClientError, Result, Target};
pub use config::{AppConfig, ClientConfig};
pub use models::{EntityKind, Thing, ThingId};
