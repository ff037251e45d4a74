use super::parse_target;
use crate::client::{RedditClient, RedditClientError, Sort, TimeWindow};
use crate::models::{Comment, EntityKind, RedditThing};
use chrono_tz::Tz;
use log::{error, info};

/// Options for listing comments
#[derive(Debug, Clone)]
pub struct CommentsOptions {
    /// Subreddit, `u/name`, or a post fullname for its comment tree
    pub target: String,
    pub count: u32,
    pub sort: Sort,
    pub window: TimeWindow,
    pub zone: Tz,
}

#[derive(Debug)]
pub struct CommentsResult {
    pub comment_count: usize,
    pub formatted_output: String,
    pub comments: Vec<Comment>,
}

/// Lists recent comments of a subreddit or redditor, or the top-level
/// comments of a post.
pub struct CommentsOperation {
    options: CommentsOptions,
    client: RedditClient,
}

impl CommentsOperation {
    pub fn new(options: CommentsOptions, client: RedditClient) -> Self {
        Self { options, client }
    }

    pub async fn execute(&self) -> Result<CommentsResult, RedditClientError> {
        let target = parse_target(&self.client, &self.options.target);
        info!("Fetching {} comments from {}", self.options.count, target.name());

        let comments = match target.kind() {
            EntityKind::Post => {
                target
                    .post_comments(self.options.sort, self.options.window, self.options.count)
                    .await?
                    .items
            }
            _ => {
                target
                    .comments(self.options.sort, self.options.window, self.options.count)
                    .await?
                    .items
            }
        };

        let mut output = String::new();
        if comments.is_empty() {
            output.push_str("No comments found.\n");
        }
        for comment in &comments {
            output.push_str(&format_comment_line(comment, &self.options.zone));
            output.push('\n');
        }

        Ok(CommentsResult {
            comment_count: comments.len(),
            formatted_output: output,
            comments,
        })
    }
}

/// `[time] t1_id summary` line shared by listings and streams.
pub(crate) fn format_comment_line(comment: &Comment, zone: &Tz) -> String {
    format!(
        "[{}] {} {}",
        comment
            .created_at()
            .with_timezone(zone)
            .format("%Y-%m-%d %H:%M:%S"),
        comment.name,
        comment.format_short_summary()
    )
}

pub async fn handle_comments_command(
    options: CommentsOptions,
    client: RedditClient,
) -> Result<(), RedditClientError> {
    match CommentsOperation::new(options, client).execute().await {
        Ok(result) => {
            print!("{}", result.formatted_output);
            Ok(())
        }
        Err(err) => {
            error!("Error fetching comments: {}", err);
            Err(err)
        }
    }
}
