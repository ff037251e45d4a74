mod common;

use common::{client, comment, listing, post};
use httpmock::Method::{GET, POST};
use httpmock::MockServer;
use redstream::client::{Sort, TimeWindow};
use redstream::operations::comments::{CommentsOperation, CommentsOptions};
use redstream::operations::posts::{PostsOperation, PostsOptions};
use redstream::operations::submit::{SubmitOperation, SubmitOptions};
use serde_json::json;

#[tokio::test]
async fn brief_posts_listing_shows_ids_and_legend() -> anyhow::Result<()> {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/r/rust/new.json").query_param("limit", "2");
        then.status(200).json_body(listing(vec![post("b"), post("a")]));
    });

    let options = PostsOptions {
        target: "r/rust".to_string(),
        count: 2,
        brief: true,
        ..PostsOptions::default()
    };
    let result = PostsOperation::new(options, client(&server)).execute().await?;

    assert_eq!(result.post_count, 2);
    assert!(result.formatted_output.starts_with("Found 2 posts\n"));
    assert!(result.formatted_output.contains("ID: t3_b"));
    assert!(result.formatted_output.contains("Legend: [T] text"));

    Ok(())
}

#[tokio::test]
async fn comments_for_a_post_use_comment_tree() -> anyhow::Result<()> {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/comments/abc");
        then.status(200).json_body(json!([
            listing(vec![post("abc")]),
            listing(vec![comment("c1", "t3_abc")]),
        ]));
    });

    let options = CommentsOptions {
        target: "t3_abc".to_string(),
        count: 10,
        sort: Sort::Top,
        window: TimeWindow::All,
        zone: chrono_tz::UTC,
    };
    let result = CommentsOperation::new(options, client(&server)).execute().await?;

    assert_eq!(result.comment_count, 1);
    assert!(result.formatted_output.contains("[2023-11-14 22:13:20] t1_c1"));

    Ok(())
}

#[tokio::test]
async fn rejected_submission_is_reported_not_raised() -> anyhow::Result<()> {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path("/api/submit");
        then.status(200).json_body(json!({
            "json": { "errors": [["SUBREDDIT_NOTALLOWED", "you aren't allowed to post there.", "sr"]] }
        }));
    });

    let options = SubmitOptions {
        subreddit: "r/private".to_string(),
        title: "t".to_string(),
        text: "x".to_string(),
    };
    let result = SubmitOperation::new(options, client(&server)).execute().await?;

    assert!(!result.success);
    assert!(result.post_url.is_none());
    assert!(result.message.contains("you aren't allowed to post there."));

    Ok(())
}
