//! Configuration module for handling environment variables and .env files

use crate::client::{RedditClientError, Result};
use dotenv::dotenv;
use log::{info, warn};
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://oauth.reddit.com";
pub const DEFAULT_AUTH_URL: &str = "https://www.reddit.com";
pub const DEFAULT_USER_AGENT: &str = concat!("redstream/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_STREAM_INTERVAL: Duration = Duration::from_secs(45);

/// Settings for the HTTP client and the polling streams.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub user_agent: String,
    /// Base URL for authenticated API calls.
    pub api_url: String,
    /// Base URL for the token and authorize endpoints.
    pub auth_url: String,
    pub request_timeout: Duration,
    pub post_stream_interval: Duration,
    pub comment_stream_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            post_stream_interval: DEFAULT_STREAM_INTERVAL,
            comment_stream_interval: DEFAULT_STREAM_INTERVAL,
        }
    }
}

impl ClientConfig {
    /// Point both the API and auth endpoints at one base URL (used by tests).
    pub fn with_base_url(mut self, base: &str) -> Self {
        self.api_url = base.trim_end_matches('/').to_string();
        self.auth_url = self.api_url.clone();
        self
    }

    pub fn with_stream_interval(mut self, interval: Duration) -> Self {
        self.post_stream_interval = interval;
        self.comment_stream_interval = interval;
        self
    }
}

/// Application configuration derived from environment variables and .env file
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    // Reddit API credentials
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,

    // OAuth settings
    pub redirect_url: Option<String>,
    pub oauth_port: Option<u16>,

    // OAuth tokens (if provided directly)
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub token_expires_in: Option<u64>,

    pub client: ClientConfig,
}

/// Read a variable, ignoring it if unset or blank.
fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Read and parse a variable. Unparseable values are reported and ignored.
fn parsed<T: FromStr>(name: &str) -> Option<T> {
    parse_value(name, &var(name)?)
}

fn parse_value<T: FromStr>(name: &str, raw: &str) -> Option<T> {
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {}: cannot parse {:?}", name, raw);
            None
        }
    }
}

/// A whole number of seconds. Zero is ignored like an unparseable value.
fn seconds(name: &str) -> Option<Duration> {
    parse_seconds(name, &var(name)?)
}

fn parse_seconds(name: &str, raw: &str) -> Option<Duration> {
    match parse_value::<u64>(name, raw)? {
        0 => {
            warn!("Ignoring {}: must be at least 1 second", name);
            None
        }
        secs => Some(Duration::from_secs(secs)),
    }
}

fn required(value: &Option<String>, name: &str) -> Result<String> {
    value.clone().ok_or_else(|| {
        RedditClientError::Config(format!("{} environment variable must be set", name))
    })
}

impl AppConfig {
    /// Load configuration from environment variables and .env file
    pub fn load() -> Self {
        // Try to load .env file, but continue even if it doesn't exist
        match dotenv() {
            Ok(_) => info!("Loaded environment from .env file"),
            Err(_) => info!("No .env file found, using system environment variables only"),
        }
        Self::from_env()
    }

    /// Build configuration from the current process environment only.
    pub fn from_env() -> Self {
        let mut client = ClientConfig::default();
        if let Some(user_agent) = var("REDDIT_USER_AGENT") {
            client.user_agent = user_agent;
        }
        if let Some(api_url) = var("REDDIT_API_URL") {
            client.api_url = api_url.trim_end_matches('/').to_string();
        }
        if let Some(auth_url) = var("REDDIT_AUTH_URL") {
            client.auth_url = auth_url.trim_end_matches('/').to_string();
        }
        if let Some(timeout) = seconds("REDDIT_REQUEST_TIMEOUT") {
            client.request_timeout = timeout;
        }
        if let Some(interval) = seconds("REDDIT_POST_STREAM_INTERVAL") {
            client.post_stream_interval = interval;
        }
        if let Some(interval) = seconds("REDDIT_COMMENT_STREAM_INTERVAL") {
            client.comment_stream_interval = interval;
        }

        Self {
            client_id: var("REDDIT_CLIENT_ID"),
            client_secret: var("REDDIT_CLIENT_SECRET"),
            username: var("REDDIT_USERNAME"),
            password: var("REDDIT_PASSWORD"),
            redirect_url: var("REDDIT_REDIRECT_URL"),
            oauth_port: parsed("REDDIT_OAUTH_PORT"),
            access_token: var("REDDIT_ACCESS_TOKEN"),
            refresh_token: var("REDDIT_REFRESH_TOKEN"),
            token_expires_in: parsed("REDDIT_TOKEN_EXPIRES_IN"),
            client,
        }
    }

    pub fn require_client_id(&self) -> Result<String> {
        required(&self.client_id, "REDDIT_CLIENT_ID")
    }

    pub fn require_client_secret(&self) -> Result<String> {
        required(&self.client_secret, "REDDIT_CLIENT_SECRET")
    }

    pub fn require_username(&self) -> Result<String> {
        required(&self.username, "REDDIT_USERNAME")
    }

    pub fn require_password(&self) -> Result<String> {
        required(&self.password, "REDDIT_PASSWORD")
    }

    /// Redirect URL for the browser flow, defaulting to a localhost callback.
    pub fn redirect_url(&self) -> String {
        self.redirect_url.clone().unwrap_or_else(|| {
            format!("http://localhost:{}/callback", self.oauth_port.unwrap_or(8080))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_reddit() {
        let config = ClientConfig::default();
        assert_eq!(config.api_url, "https://oauth.reddit.com");
        assert_eq!(config.auth_url, "https://www.reddit.com");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.post_stream_interval, Duration::from_secs(45));
        assert_eq!(config.comment_stream_interval, Duration::from_secs(45));
    }

    #[test]
    fn missing_required_values_are_config_errors() {
        let config = AppConfig::default();
        match config.require_client_id() {
            Err(RedditClientError::Config(msg)) => assert!(msg.contains("REDDIT_CLIENT_ID")),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn redirect_url_defaults_to_oauth_port() {
        let config = AppConfig {
            oauth_port: Some(9000),
            ..AppConfig::default()
        };
        assert_eq!(config.redirect_url(), "http://localhost:9000/callback");
    }

    #[test]
    fn zero_and_garbage_durations_are_ignored() {
        assert_eq!(parse_seconds("REDDIT_POST_STREAM_INTERVAL", "0"), None);
        assert_eq!(parse_seconds("REDDIT_REQUEST_TIMEOUT", " 0 "), None);
        assert_eq!(parse_seconds("REDDIT_REQUEST_TIMEOUT", "soon"), None);
        assert_eq!(parse_seconds("REDDIT_REQUEST_TIMEOUT", "-5"), None);
        assert_eq!(
            parse_seconds("REDDIT_COMMENT_STREAM_INTERVAL", "12"),
            Some(Duration::from_secs(12))
        );
    }

    #[test]
    fn base_url_override_trims_slash() {
        let config = ClientConfig::default().with_base_url("http://127.0.0.1:1234/");
        assert_eq!(config.api_url, "http://127.0.0.1:1234");
        assert_eq!(config.auth_url, "http://127.0.0.1:1234");
    }
}
