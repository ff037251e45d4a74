mod common;

use common::client;
use httpmock::Method::POST;
use httpmock::MockServer;
use redstream::models::RedditThing;
use redstream::{EntityKind, RedditClientError, ThingId};
use serde_json::json;

#[tokio::test]
async fn submit_posts_form_with_api_type() -> anyhow::Result<()> {
    let server = MockServer::start();
    let client = client(&server);

    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/submit")
            .form_urlencoded_tuple("api_type", "json")
            .form_urlencoded_tuple("sr", "rust")
            .form_urlencoded_tuple("kind", "self")
            .form_urlencoded_tuple("title", "Hello");
        then.status(200).json_body(json!({
            "json": {
                "errors": [],
                "data": {
                    "url": "https://www.reddit.com/r/rust/comments/new1/hello/",
                    "id": "new1",
                    "name": "t3_new1"
                }
            }
        }));
    });

    let response = client.subreddit(&["rust"]).await.submit("Hello", "body").await?;

    mock.assert();
    assert!(response.is_ok());
    assert_eq!(response.name, Some(ThingId::from("t3_new1")));
    assert_eq!(
        response.url.as_deref(),
        Some("https://www.reddit.com/r/rust/comments/new1/hello/")
    );

    Ok(())
}

#[tokio::test]
async fn reply_returns_created_comment() -> anyhow::Result<()> {
    let server = MockServer::start();
    let client = client(&server);

    server.mock(|when, then| {
        when.method(POST)
            .path("/api/comment")
            .form_urlencoded_tuple("thing_id", "t1_parent");
        then.status(200).json_body(json!({
            "json": {
                "errors": [],
                "data": { "things": [{
                    "kind": "t1",
                    "data": { "name": "t1_child", "permalink": "/r/rust/comments/p/x/child/" }
                }] }
            }
        }));
    });

    let response = client.comment("t1_parent").await.reply("thanks").await?;
    assert_eq!(response.things.len(), 1);
    assert_eq!(response.things[0].id(), ThingId::from("t1_child"));
    assert_eq!(
        response.things[0].url(),
        "https://www.reddit.com/r/rust/comments/p/x/child/"
    );

    Ok(())
}

#[tokio::test]
async fn json_errors_become_api_errors() -> anyhow::Result<()> {
    let server = MockServer::start();
    let client = client(&server);

    server.mock(|when, then| {
        when.method(POST).path("/api/comment");
        then.status(200).json_body(json!({
            "json": { "errors": [
                ["RATELIMIT", "you are doing that too much", "ratelimit"],
                ["TOO_LONG", "this is too long", "text"]
            ] }
        }));
    });

    let err = client
        .target(EntityKind::Post, "t3_abc")
        .reply("hi")
        .await
        .unwrap_err();

    match err {
        RedditClientError::ApiError { message, error } => {
            assert_eq!(error, "RATELIMIT");
            assert_eq!(message, "you are doing that too much; this is too long");
        }
        other => panic!("expected ApiError, got {:?}", other),
    }

    Ok(())
}

#[tokio::test]
async fn moderation_actions_hit_subreddit_paths() -> anyhow::Result<()> {
    let server = MockServer::start();
    let client = client(&server);

    let ban = server.mock(|when, then| {
        when.method(POST)
            .path("/r/rust/api/friend")
            .form_urlencoded_tuple("name", "spammer")
            .form_urlencoded_tuple("duration", "3")
            .form_urlencoded_tuple("type", "banned");
        then.status(200).json_body(json!({}));
    });
    let remove = server.mock(|when, then| {
        when.method(POST)
            .path("/api/remove")
            .form_urlencoded_tuple("id", "t3_bad")
            .form_urlencoded_tuple("spam", "true");
        then.status(200).body("");
    });

    let sr = client.target(EntityKind::Subreddit, "rust");
    assert!(sr.ban("spammer", 3, "t3_bad", "bye", "spam").await?.is_ok());
    assert!(client
        .target(EntityKind::Post, "t3_bad")
        .remove(true)
        .await?
        .is_ok());

    ban.assert();
    remove.assert();

    Ok(())
}

#[tokio::test]
async fn inbox_actions_require_me() -> anyhow::Result<()> {
    let server = MockServer::start();
    let client = client(&server);

    let mock = server.mock(|when, then| {
        when.method(POST).path("/api/read_all_messages");
        then.status(200).json_body(json!({}));
    });

    let err = client
        .target(EntityKind::Redditor, "someone")
        .read_all_messages()
        .await
        .unwrap_err();
    assert!(matches!(err, RedditClientError::NotMe { .. }));
    mock.assert_hits(0);

    client.me().await;
    let target = client.selected().await?;
    target.read_all_messages().await?;
    mock.assert();

    Ok(())
}
