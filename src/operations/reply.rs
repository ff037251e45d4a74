use crate::client::{RedditClient, RedditClientError};
use crate::models::{EntityKind, RedditThing, ThingId};
use log::{error, info};

/// Options for replying to a post or comment
#[derive(Debug, Clone)]
pub struct ReplyOptions {
    /// Fullname of the parent: `t3_...` for a post, `t1_...` for a comment
    pub thing_id: String,
    pub text: String,
}

#[derive(Debug)]
pub struct ReplyResult {
    pub success: bool,
    /// Permalink or fullname of the new comment
    pub comment_url: Option<String>,
    pub message: String,
}

/// Replies to a post or comment.
pub struct ReplyOperation {
    options: ReplyOptions,
    client: RedditClient,
}

impl ReplyOperation {
    pub fn new(options: ReplyOptions, client: RedditClient) -> Self {
        Self { options, client }
    }

    pub async fn execute(&self) -> Result<ReplyResult, RedditClientError> {
        let parent = ThingId::from(self.options.thing_id.as_str());
        let kind = parent.kind();
        if !matches!(kind, EntityKind::Post | EntityKind::Comment) {
            return Err(RedditClientError::InvalidTarget {
                operation: "reply",
                expected: vec![EntityKind::Post, EntityKind::Comment],
                found: kind,
            });
        }
        info!("Replying to {}", parent);

        let reply = self
            .client
            .target(kind, parent.as_str())
            .reply(&self.options.text)
            .await;

        match reply {
            Ok(response) => {
                let url = response.things.first().map(|thing| thing.url());
                Ok(ReplyResult {
                    success: true,
                    message: format!(
                        "Comment created successfully! {}",
                        url.as_deref().unwrap_or("")
                    ),
                    comment_url: url,
                })
            }
            Err(err @ RedditClientError::ApiError { .. }) => Ok(ReplyResult {
                success: false,
                comment_url: None,
                message: format!(
                    "Error creating comment: {}\n\n\
                     Note: replying requires a token with the 'submit' scope.",
                    err
                ),
            }),
            Err(err) => Err(err),
        }
    }
}

pub async fn handle_reply_command(
    options: ReplyOptions,
    client: RedditClient,
) -> Result<(), RedditClientError> {
    match ReplyOperation::new(options, client).execute().await {
        Ok(result) => {
            if result.success {
                println!("{}", result.message);
            } else {
                eprintln!("{}", result.message);
            }
            Ok(())
        }
        Err(err) => {
            error!("Error executing reply operation: {}", err);
            Err(err)
        }
    }
}
