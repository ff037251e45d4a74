use crate::models::{DecodeError, EntityKind};
use thiserror::Error;

fn kinds(expected: &[EntityKind]) -> String {
    expected
        .iter()
        .map(|k| k.prefix())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors surfaced by the Reddit client.
#[derive(Debug, Error)]
pub enum RedditClientError {
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// The API answered with an embedded `{message, error}` body.
    #[error("Reddit API error: {message} ({error})")]
    ApiError { message: String, error: String },

    #[error("Server returned error status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("{operation} expects a target of kind [{}], found {found}", kinds(.expected))]
    InvalidTarget {
        operation: &'static str,
        expected: Vec<EntityKind>,
        found: EntityKind,
    },

    #[error("no target selected")]
    NoTargetSelected,

    #[error("{operation} only applies to the logged-in account, found {found:?}")]
    NotMe {
        operation: &'static str,
        found: String,
    },

    #[error("no results for {0}")]
    NoResults(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for RedditClientError {
    fn from(err: serde_json::Error) -> Self {
        RedditClientError::Decode(DecodeError::Json(err))
    }
}

pub type Result<T> = std::result::Result<T, RedditClientError>;
