use crate::auth::{browser, Credentials, OAuthSession, TokenStorage, DEFAULT_SCOPES};
use crate::client::RedditClientError;
use crate::config::AppConfig;
use log::{error, info};
use std::path::PathBuf;

/// Options for the browser authorization flow
#[derive(Debug, Clone)]
pub struct AuthorizeOptions {
    /// Port for the localhost callback; overrides the configured redirect URL
    pub port: Option<u16>,
    /// Space-separated OAuth scopes
    pub scopes: String,
}

impl Default for AuthorizeOptions {
    fn default() -> Self {
        Self {
            port: None,
            scopes: DEFAULT_SCOPES.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct AuthorizeResult {
    /// Where the token was saved
    pub token_path: PathBuf,
    pub scope: Option<String>,
    pub has_refresh_token: bool,
}

/// Runs the installed-app flow in the browser and stores the resulting
/// token for later runs.
pub struct AuthorizeOperation {
    options: AuthorizeOptions,
    config: AppConfig,
}

impl AuthorizeOperation {
    pub fn new(options: AuthorizeOptions, config: AppConfig) -> Self {
        Self { options, config }
    }

    pub async fn execute(&self) -> Result<AuthorizeResult, RedditClientError> {
        let client_id = self.config.require_client_id()?;
        let mut config = self.config.clone();
        if self.options.port.is_some() {
            config.oauth_port = self.options.port;
            config.redirect_url = None;
        }

        let storage = TokenStorage::for_client(&client_id);
        let token_path = storage.path().to_path_buf();
        let credentials = Credentials {
            client_id,
            client_secret: config.client_secret.clone(),
            username: None,
            password: None,
            redirect_url: config.redirect_url(),
        };
        let session =
            OAuthSession::new(&config.client, credentials)?.on_refresh(storage.callback());

        info!("Starting browser authentication flow. This will open your default web browser.");
        info!("After logging in, authorize the application to access your Reddit account.");
        let token = browser::authorize(&session, &self.options.scopes).await?;

        Ok(AuthorizeResult {
            token_path,
            scope: token.scope,
            has_refresh_token: token.refresh_token.is_some(),
        })
    }
}

pub async fn handle_authorize_command(
    options: AuthorizeOptions,
    config: AppConfig,
) -> Result<(), RedditClientError> {
    match AuthorizeOperation::new(options, config).execute().await {
        Ok(result) => {
            info!("Authorization successful. Token saved to {}", result.token_path.display());
            if let Some(scope) = &result.scope {
                info!("Granted scopes: {}", scope);
            }
            if !result.has_refresh_token {
                info!(
                    "No refresh token was issued; \
                     you will need to authorize again when it expires."
                );
            }
            Ok(())
        }
        Err(err) => {
            error!("Failed to authenticate with Reddit API: {}", err);
            Err(err)
        }
    }
}
