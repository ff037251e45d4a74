mod common;

use common::listing;
use httpmock::Method::{GET, POST};
use httpmock::MockServer;
use redstream::auth::{Credentials, OAuthSession, Token, TokenSource, TokenStorage};
use redstream::client::{Sort, TimeWindow};
use redstream::{ClientConfig, EntityKind, RedditClient, RedditClientError};
use serde_json::json;
use std::sync::{Arc, Mutex};

fn credentials() -> Credentials {
    Credentials {
        client_id: "cid".into(),
        client_secret: Some("secret".into()),
        redirect_url: "http://localhost:8080/callback".into(),
        ..Credentials::default()
    }
}

#[tokio::test]
async fn expired_token_is_refreshed_and_reported() -> anyhow::Result<()> {
    let server = MockServer::start();
    let config = ClientConfig::default().with_base_url(&server.base_url());

    let grant = server.mock(|when, then| {
        when.method(POST)
            .path("/api/v1/access_token")
            .header_exists("authorization")
            .form_urlencoded_tuple("grant_type", "refresh_token")
            .form_urlencoded_tuple("refresh_token", "r-1");
        then.status(200).json_body(json!({
            "access_token": "fresh",
            "token_type": "bearer",
            "expires_in": 3600,
            "scope": "read"
        }));
    });
    let api = server.mock(|when, then| {
        when.method(GET)
            .path("/r/rust/new.json")
            .header("authorization", "Bearer fresh");
        then.status(200).json_body(listing(vec![]));
    });

    let refreshed: Arc<Mutex<Vec<Token>>> = Arc::default();
    let sink = Arc::clone(&refreshed);
    let expired = Token::new("stale")
        .expiring_in(0)
        .with_refresh_token(Some("r-1".into()));
    let session = OAuthSession::new(&config, credentials())?
        .with_token(Some(expired))
        .on_refresh(Box::new(move |token| sink.lock().unwrap().push(token.clone())));

    let client = RedditClient::with_token_source(config, Arc::new(session))?;
    let target = client.target(EntityKind::Subreddit, "rust");
    target.posts(Sort::New, TimeWindow::All, 5).await?;
    // The second call reuses the cached token.
    target.posts(Sort::New, TimeWindow::All, 5).await?;

    grant.assert();
    api.assert_hits(2);
    let refreshed = refreshed.lock().unwrap();
    assert_eq!(refreshed.len(), 1);
    assert_eq!(refreshed[0].access_token, "fresh");
    // Reddit omitted the refresh token, so the old one is kept.
    assert_eq!(refreshed[0].refresh_token.as_deref(), Some("r-1"));
    assert_eq!(refreshed[0].scope.as_deref(), Some("read"));

    Ok(())
}

#[tokio::test]
async fn grant_error_is_auth_error() -> anyhow::Result<()> {
    let server = MockServer::start();
    let config = ClientConfig::default().with_base_url(&server.base_url());

    server.mock(|when, then| {
        when.method(POST).path("/api/v1/access_token");
        then.status(200).json_body(json!({ "error": "invalid_grant" }));
    });

    let session = OAuthSession::new(&config, credentials())?;
    let err = session.access_token().await.unwrap_err();
    assert!(matches!(err, RedditClientError::Auth(msg) if msg == "invalid_grant"));

    Ok(())
}

#[tokio::test]
async fn exchanged_code_is_persisted_by_storage_callback() -> anyhow::Result<()> {
    let server = MockServer::start();
    let config = ClientConfig::default().with_base_url(&server.base_url());
    let dir = tempfile::tempdir()?;
    let storage = TokenStorage::at("cid", dir.path().join("cid.json"));

    server.mock(|when, then| {
        when.method(POST)
            .path("/api/v1/access_token")
            .form_urlencoded_tuple("grant_type", "authorization_code")
            .form_urlencoded_tuple("code", "the-code");
        then.status(200).json_body(json!({
            "access_token": "user-token",
            "refresh_token": "r-2",
            "expires_in": 3600
        }));
    });

    let session = OAuthSession::new(&config, credentials())?
        .on_refresh(TokenStorage::at("cid", storage.path()).callback());
    session.exchange_code("the-code").await?;

    let stored = storage.load().expect("token saved");
    assert_eq!(stored.access_token, "user-token");
    assert_eq!(stored.refresh_token.as_deref(), Some("r-2"));
    assert!(stored.is_valid());

    Ok(())
}
