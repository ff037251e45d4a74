//! HTTP client for the Reddit API.
//!
//! Operations act on a selected target. Targets are either queued on the
//! client with the selector methods ([`RedditClient::subreddit`],
//! [`RedditClient::post`], ...) and consumed by the next operation, or held
//! directly as a [`Target`] handle.

pub mod actions;
pub mod error;
pub mod info;
pub mod listing;
pub mod queue;
pub mod stream;

pub use actions::Action;
pub use error::{RedditClientError, Result};
pub use info::Info;
pub use listing::{Sort, TimeWindow};
pub use queue::{Selection, SelectionQueue};
pub use stream::{ListingSource, PollCursor, SubmissionStream};

use crate::auth::{Credentials, OAuthSession, StaticToken, Token, TokenSource, TokenStorage};
use crate::config::{AppConfig, ClientConfig};
use crate::models::{EntityKind, Response};
use log::debug;
use reqwest::{Client, Method};
use serde_json::Value;
use std::sync::Arc;

struct Inner {
    http: Client,
    config: ClientConfig,
    tokens: Option<Arc<dyn TokenSource>>,
    queue: SelectionQueue,
}

/// Cheap to clone; clones share the HTTP pool, token source and queue.
#[derive(Clone)]
pub struct RedditClient {
    inner: Arc<Inner>,
}

/// A client bound to one selection.
#[derive(Clone)]
pub struct Target {
    client: RedditClient,
    selection: Selection,
}

impl RedditClient {
    pub fn new(config: ClientConfig, tokens: Option<Arc<dyn TokenSource>>) -> Result<Self> {
        debug!("Creating RedditClient with user_agent: {}", config.user_agent);
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            inner: Arc::new(Inner {
                http,
                config,
                tokens,
                queue: SelectionQueue::new(),
            }),
        })
    }

    /// A client that sends no Authorization header.
    pub fn anonymous(config: ClientConfig) -> Result<Self> {
        Self::new(config, None)
    }

    pub fn with_token_source(config: ClientConfig, tokens: Arc<dyn TokenSource>) -> Result<Self> {
        Self::new(config, Some(tokens))
    }

    /// Create a client from a configuration object.
    ///
    /// With a client id, tokens are managed by an [`OAuthSession`] that
    /// starts from the environment token or the stored one and persists every
    /// refresh. A bare access token is used as-is.
    pub fn from_config(app: &AppConfig) -> Result<Self> {
        let config = app.client.clone();

        let Some(client_id) = app.client_id.clone() else {
            return match &app.access_token {
                Some(token) => {
                    Self::with_token_source(config, Arc::new(StaticToken(token.clone())))
                }
                None => Self::anonymous(config),
            };
        };

        let storage = TokenStorage::for_client(&client_id);
        let initial = match &app.access_token {
            Some(access_token) => {
                let token = Token::new(access_token.clone())
                    .with_refresh_token(app.refresh_token.clone());
                Some(match app.token_expires_in {
                    Some(secs) => token.expiring_in(secs),
                    None => token,
                })
            }
            None => storage.load().or_else(|| {
                app.refresh_token
                    .clone()
                    .map(|refresh| Token::new("").with_refresh_token(Some(refresh)))
            }),
        };

        let credentials = Credentials {
            client_id,
            client_secret: app.client_secret.clone(),
            username: app.username.clone(),
            password: app.password.clone(),
            redirect_url: app.redirect_url(),
        };
        let session = OAuthSession::new(&config, credentials)?
            .with_token(initial)
            .on_refresh(storage.callback());
        Self::with_token_source(config, Arc::new(session))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    // Selectors

    /// Queue one or more subreddits. Several names are combined with `+`.
    pub async fn subreddit(&self, names: &[&str]) -> &Self {
        self.select(Selection::new(names.join("+"), EntityKind::Subreddit))
            .await
    }

    pub async fn redditor(&self, name: &str) -> &Self {
        self.select(Selection::new(name, EntityKind::Redditor)).await
    }

    pub async fn post(&self, id: &str) -> &Self {
        self.select(Selection::new(id, EntityKind::Post)).await
    }

    pub async fn comment(&self, id: &str) -> &Self {
        self.select(Selection::new(id, EntityKind::Comment)).await
    }

    /// Queue the logged-in account.
    pub async fn me(&self) -> &Self {
        self.select(Selection::me()).await
    }

    /// Queue a selection; waits while the queue is full.
    pub async fn select(&self, selection: Selection) -> &Self {
        self.inner.queue.select(selection).await;
        self
    }

    pub fn queue(&self) -> &SelectionQueue {
        &self.inner.queue
    }

    /// Take the next queued selection as a [`Target`].
    pub async fn selected(&self) -> Result<Target> {
        let selection = self.inner.queue.dequeue().await?;
        Ok(self.bind(selection))
    }

    /// Take the next queued selection, checking it for `operation`.
    pub(crate) async fn selected_for(
        &self,
        operation: &'static str,
        expected: &[EntityKind],
    ) -> Result<Target> {
        let selection = self.inner.queue.check_type(operation, expected).await?;
        Ok(self.bind(selection))
    }

    /// A handle on `name` that bypasses the queue.
    pub fn target(&self, kind: EntityKind, name: &str) -> Target {
        self.bind(Selection::new(name, kind))
    }

    fn bind(&self, selection: Selection) -> Target {
        Target {
            client: self.clone(),
            selection,
        }
    }

    // Transport

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.inner.config.api_url.trim_end_matches('/'), path)
    }

    /// Issue one request. GET parameters go in the query string, anything
    /// else is sent form-encoded.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Value> {
        let url = self.endpoint(path);
        debug!("{} {}", method, url);

        let mut req_builder = self.inner.http.request(method.clone(), &url);
        req_builder = if method == Method::GET {
            req_builder.query(params)
        } else {
            req_builder.form(params)
        };

        // Add authorization header if we have a token source
        if let Some(tokens) = &self.inner.tokens {
            req_builder = req_builder.bearer_auth(tokens.access_token().await?);
        }

        let response = req_builder.send().await?;
        let status = response.status();
        debug!("Response status: {}", status);

        let body = response.text().await?;
        debug!("Response body length: {} bytes", body.len());
        check_body(status.as_u16(), &body)
    }

    pub async fn get(&self, path: &str, params: &[(&str, String)]) -> Result<Value> {
        self.request(Method::GET, path, params).await
    }

    pub async fn post_form(&self, path: &str, params: &[(&str, String)]) -> Result<Value> {
        self.request(Method::POST, path, params).await
    }

    /// GET a path whose body is a single top-level envelope.
    pub(crate) async fn get_response(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Response> {
        let value = self.get(path, params).await?;
        Ok(Response::from_value(value)?)
    }
}

/// Turn a response body into JSON, surfacing embedded API errors.
///
/// Reddit reports some failures as `{"message": ..., "error": ...}` with a
/// 200 status, so the body is inspected before the status.
fn check_body(status: u16, body: &str) -> Result<Value> {
    let success = (200..300).contains(&status);
    if body.trim().is_empty() {
        return if success {
            Ok(Value::Null)
        } else {
            Err(RedditClientError::Status {
                status,
                body: String::new(),
            })
        };
    }

    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) if !success => {
            return Err(RedditClientError::Status {
                status,
                body: body.to_string(),
            })
        }
        Err(e) => {
            debug!("First 100 chars: {}", body.chars().take(100).collect::<String>());
            return Err(e.into());
        }
    };

    if let (Some(message), Some(error)) = (value.get("message"), value.get("error")) {
        let text = |v: &Value| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Err(RedditClientError::ApiError {
            message: text(message),
            error: text(error),
        });
    }

    if !success {
        return Err(RedditClientError::Status {
            status,
            body: body.to_string(),
        });
    }
    Ok(value)
}

impl Target {
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn name(&self) -> &str {
        &self.selection.name
    }

    pub fn kind(&self) -> EntityKind {
        self.selection.kind
    }

    pub fn client(&self) -> &RedditClient {
        &self.client
    }

    /// Validate this target for `operation`.
    pub(crate) fn check(&self, operation: &'static str, expected: &[EntityKind]) -> Result<&str> {
        self.selection.clone().check(operation, expected)?;
        Ok(&self.selection.name)
    }

    /// Validate that this target is the logged-in account.
    pub(crate) fn check_me(&self, operation: &'static str) -> Result<()> {
        self.check(operation, &[EntityKind::Redditor])?;
        if self.selection.name != "me" {
            return Err(RedditClientError::NotMe {
                operation,
                found: self.selection.name.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn embedded_error_wins_over_success_status() {
        match check_body(200, r#"{"message": "Forbidden", "error": 403}"#) {
            Err(RedditClientError::ApiError { message, error }) => {
                assert_eq!(message, "Forbidden");
                assert_eq!(error, "403");
            }
            other => panic!("expected ApiError, got {:?}", other),
        }
    }

    #[test]
    fn status_error_without_embedded_body() {
        assert!(matches!(
            check_body(503, "<html>down</html>"),
            Err(RedditClientError::Status { status: 503, .. })
        ));
        assert!(matches!(
            check_body(404, r#"{"reason": "gone"}"#),
            Err(RedditClientError::Status { status: 404, .. })
        ));
    }

    #[test]
    fn passes_through_json_and_empty_bodies() {
        assert_eq!(check_body(200, r#"{"a": 1}"#).unwrap(), json!({"a": 1}));
        assert_eq!(check_body(202, "").unwrap(), Value::Null);
        assert!(matches!(
            check_body(200, "not json"),
            Err(RedditClientError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn selectors_queue_in_order() {
        let client = RedditClient::anonymous(ClientConfig::default()).unwrap();
        client.subreddit(&["rust", "golang"]).await;
        client.me().await;

        let first = client.selected().await.unwrap();
        assert_eq!(first.name(), "rust+golang");
        assert_eq!(first.kind(), EntityKind::Subreddit);

        let second = client.selected().await.unwrap();
        assert!(second.check_me("read_all_messages").is_ok());

        assert!(matches!(
            client.selected().await,
            Err(RedditClientError::NoTargetSelected)
        ));
    }

    #[test]
    fn check_me_rejects_other_redditors() {
        let client = RedditClient::anonymous(ClientConfig::default()).unwrap();
        let target = client.target(EntityKind::Redditor, "someone");
        assert!(matches!(
            target.check_me("read_message"),
            Err(RedditClientError::NotMe { .. })
        ));
    }
}
