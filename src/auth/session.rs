use super::{Credentials, Token, TokenSource, DEFAULT_SCOPES};
use crate::client::{RedditClientError, Result};
use crate::config::ClientConfig;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;
use url::Url;

/// Called with every token the session obtains.
pub type TokenCallback = Box<dyn Fn(&Token) + Send + Sync>;

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<u64>,
    scope: Option<String>,
    error: Option<String>,
}

/// Holds the current token and renews it against the token endpoint.
pub struct OAuthSession {
    http: Client,
    auth_url: String,
    credentials: Credentials,
    token: Mutex<Option<Token>>,
    on_refresh: Option<TokenCallback>,
}

impl OAuthSession {
    pub fn new(config: &ClientConfig, credentials: Credentials) -> Result<Self> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            auth_url: config.auth_url.trim_end_matches('/').to_string(),
            credentials,
            token: Mutex::new(None),
            on_refresh: None,
        })
    }

    /// Start from a known token (loaded from storage or the environment).
    pub fn with_token(mut self, token: Option<Token>) -> Self {
        self.token = Mutex::new(token);
        self
    }

    pub fn on_refresh(mut self, callback: TokenCallback) -> Self {
        self.on_refresh = Some(callback);
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub async fn token(&self) -> Option<Token> {
        self.token.lock().await.clone()
    }

    pub async fn set_token(&self, token: Token) {
        self.notify(&token);
        *self.token.lock().await = Some(token);
    }

    /// The URL that starts the authorization-code flow.
    pub fn auth_code_url(&self, state: &str, scopes: &str) -> Result<Url> {
        Url::parse_with_params(
            &format!("{}/api/v1/authorize", self.auth_url),
            &[
                ("client_id", self.credentials.client_id.as_str()),
                ("response_type", "code"),
                ("state", state),
                ("redirect_uri", self.credentials.redirect_url.as_str()),
                ("duration", "permanent"),
                ("scope", scopes),
            ],
        )
        .map_err(|e| RedditClientError::Config(format!("invalid auth URL: {}", e)))
    }

    /// Exchange an authorization code for a token and keep it.
    pub async fn exchange_code(&self, code: &str) -> Result<Token> {
        let token = self
            .grant(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.credentials.redirect_url.as_str()),
            ])
            .await?;
        self.set_token(token.clone()).await;
        Ok(token)
    }

    /// Log in with the configured username and password and keep the token.
    pub async fn login(&self) -> Result<Token> {
        let token = self.password_grant().await?;
        self.set_token(token.clone()).await;
        Ok(token)
    }

    async fn password_grant(&self) -> Result<Token> {
        let (username, password) = match (&self.credentials.username, &self.credentials.password) {
            (Some(u), Some(p)) => (u.as_str(), p.as_str()),
            _ => {
                return Err(RedditClientError::Auth(
                    "username and password are required for the password grant".to_string(),
                ))
            }
        };
        self.grant(&[
            ("grant_type", "password"),
            ("username", username),
            ("password", password),
            ("scope", DEFAULT_SCOPES),
        ])
        .await
    }

    /// Pick the best available grant for a new token.
    async fn obtain(&self, current: Option<&Token>) -> Result<Token> {
        if let Some(refresh_token) = current.and_then(|t| t.refresh_token.as_deref()) {
            debug!("Refreshing access token using refresh token");
            let token = self
                .grant(&[
                    ("grant_type", "refresh_token"),
                    ("refresh_token", refresh_token),
                ])
                .await?;
            // Reddit does not always send the refresh token back.
            let kept = token.refresh_token.clone().or_else(|| Some(refresh_token.to_string()));
            return Ok(token.with_refresh_token(kept));
        }
        if self.credentials.username.is_some() && self.credentials.password.is_some() {
            debug!("Requesting access token with password grant");
            return self.password_grant().await;
        }
        debug!("Requesting application-only access token");
        self.grant(&[
            ("grant_type", "https://oauth.reddit.com/grants/installed_client"),
            ("device_id", "DO_NOT_TRACK_THIS_DEVICE"),
        ])
        .await
    }

    async fn grant(&self, params: &[(&str, &str)]) -> Result<Token> {
        let auth = base64::encode(format!(
            "{}:{}",
            self.credentials.client_id,
            self.credentials.client_secret.as_deref().unwrap_or_default()
        ));

        let res = self
            .http
            .post(format!("{}/api/v1/access_token", self.auth_url))
            .header("Authorization", format!("Basic {}", auth))
            .form(params)
            .send()
            .await?;

        // Check for HTTP errors
        let status = res.status();
        let body = res.text().await?;
        if !status.is_success() {
            return Err(RedditClientError::Auth(format!("HTTP {}: {}", status, body)));
        }

        let json: TokenResponse = serde_json::from_str(&body)?;
        if let Some(error) = json.error {
            return Err(RedditClientError::Auth(error));
        }
        let access_token = json.access_token.ok_or_else(|| {
            RedditClientError::Auth("Failed to extract access token from response".to_string())
        })?;

        debug!("Token obtained with scopes: {:?}", json.scope);
        let mut token = Token::new(access_token)
            .expiring_in(json.expires_in.unwrap_or(3600))
            .with_refresh_token(json.refresh_token);
        token.scope = json.scope;
        Ok(token)
    }

    fn notify(&self, token: &Token) {
        if let Some(callback) = &self.on_refresh {
            callback(token);
        }
    }
}

#[async_trait]
impl TokenSource for OAuthSession {
    async fn access_token(&self) -> Result<String> {
        let mut current = self.token.lock().await;
        if let Some(token) = current.as_ref().filter(|t| t.is_valid()) {
            return Ok(token.access_token.clone());
        }
        let fresh = self.obtain(current.as_ref()).await?;
        self.notify(&fresh);
        let access_token = fresh.access_token.clone();
        *current = Some(fresh);
        Ok(access_token)
    }
}
