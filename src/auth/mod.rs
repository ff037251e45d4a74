//! OAuth2 tokens and the sources that hand them to the client.

pub mod browser;
pub mod session;
pub mod storage;

pub use session::{OAuthSession, TokenCallback};
pub use storage::TokenStorage;

use crate::client::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Scopes requested when none are given.
pub const DEFAULT_SCOPES: &str = "identity read submit edit history modposts modflair \
     modconfig modlog modmail privatemessages wikiread";

/// Tokens closer than this to expiry are treated as expired.
const EXPIRY_BUFFER_SECS: i64 = 300;

/// An OAuth2 bearer token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// `None` for tokens handed in without a known lifetime.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub scope: Option<String>,
}

impl Token {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            expires_at: None,
            scope: None,
        }
    }

    pub fn expiring_in(mut self, secs: u64) -> Self {
        self.expires_at = Some(Utc::now() + Duration::seconds(secs as i64));
        self
    }

    pub fn with_refresh_token(mut self, refresh_token: Option<String>) -> Self {
        self.refresh_token = refresh_token;
        self
    }

    /// Whether the access token can still be used, with a 5-minute buffer.
    pub fn is_valid(&self) -> bool {
        if self.access_token.is_empty() {
            return false;
        }
        match self.expires_at {
            Some(expiry) => Utc::now() + Duration::seconds(EXPIRY_BUFFER_SECS) < expiry,
            None => true,
        }
    }
}

/// Application credentials for the token endpoint.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub redirect_url: String,
}

/// Something that can produce a bearer token for a request.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn access_token(&self) -> Result<String>;
}

/// A fixed token, never refreshed.
pub struct StaticToken(pub String);

#[async_trait]
impl TokenSource for StaticToken {
    async fn access_token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_validity_uses_buffer() {
        assert!(Token::new("abc").is_valid());
        assert!(Token::new("abc").expiring_in(3600).is_valid());
        assert!(!Token::new("abc").expiring_in(120).is_valid());
        assert!(!Token::new("").is_valid());
    }

    #[test]
    fn token_round_trips_through_json() {
        let token = Token::new("abc")
            .expiring_in(3600)
            .with_refresh_token(Some("r".into()));
        let json = serde_json::to_string(&token).unwrap();
        let back: Token = serde_json::from_str(&json).unwrap();
        assert_eq!(back.refresh_token.as_deref(), Some("r"));
        assert!(back.is_valid());
    }
}
