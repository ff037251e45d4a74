#![allow(
    unused,
    reason = "Each test binary uses a different subset of the helpers"
)]

use httpmock::MockServer;
use redstream::{ClientConfig, RedditClient};
use serde_json::{json, Value};
use std::time::Duration;

pub fn client(server: &MockServer) -> RedditClient {
    let config = ClientConfig::default()
        .with_base_url(&server.base_url())
        .with_stream_interval(Duration::from_millis(20));
    RedditClient::anonymous(config).unwrap()
}

pub fn listing(children: Vec<Value>) -> Value {
    json!({
        "kind": "Listing",
        "data": { "after": null, "before": null, "dist": children.len(), "children": children }
    })
}

pub fn post(id36: &str) -> Value {
    json!({
        "kind": "t3",
        "data": {
            "id": id36,
            "name": format!("t3_{}", id36),
            "title": format!("post {}", id36),
            "author": "alice",
            "subreddit": "rust",
            "subreddit_id": "t5_2s7lj",
            "permalink": format!("/r/rust/comments/{}/x/", id36),
            "created_utc": 1_700_000_000.0,
            "score": 1,
        }
    })
}

pub fn comment(id36: &str, link: &str) -> Value {
    json!({
        "kind": "t1",
        "data": {
            "id": id36,
            "name": format!("t1_{}", id36),
            "body": format!("comment {}", id36),
            "author": "bob",
            "link_id": link,
            "parent_id": link,
            "subreddit": "rust",
            "permalink": format!("/r/rust/comments/x/y/{}/", id36),
            "created_utc": "1700000000",
            "replies": "",
        }
    })
}
