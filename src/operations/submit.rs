use super::display_subreddit;
use crate::client::{RedditClient, RedditClientError};
use log::{error, info};

/// Configuration options for submitting a self post
#[derive(Debug, Clone)]
pub struct SubmitOptions {
    /// The name of the subreddit to post to
    pub subreddit: String,
    pub title: String,
    pub text: String,
}

/// Result of a submission
#[derive(Debug)]
pub struct SubmitResult {
    pub success: bool,
    /// URL of the created post (if successful)
    pub post_url: Option<String>,
    /// Formatted message for CLI output
    pub message: String,
}

/// Submits a self post through the client's selection queue.
pub struct SubmitOperation {
    options: SubmitOptions,
    client: RedditClient,
}

impl SubmitOperation {
    pub fn new(options: SubmitOptions, client: RedditClient) -> Self {
        Self { options, client }
    }

    pub async fn execute(&self) -> Result<SubmitResult, RedditClientError> {
        let display_sub = display_subreddit(&self.options.subreddit);
        info!("Creating a new post in {}: '{}'", display_sub, self.options.title);

        let name = display_sub.trim_start_matches("r/");
        let response = self
            .client
            .subreddit(&[name])
            .await
            .submit(&self.options.title, &self.options.text)
            .await;

        match response {
            Ok(response) => {
                let url = response
                    .url
                    .clone()
                    .or_else(|| response.name.as_ref().map(|id| id.to_string()));
                Ok(SubmitResult {
                    success: true,
                    message: format!(
                        "Post created successfully! URL: {}",
                        url.as_deref().unwrap_or("(not returned)")
                    ),
                    post_url: url,
                })
            }
            // Rejections from Reddit are reported, not propagated.
            Err(err @ RedditClientError::ApiError { .. }) => Ok(SubmitResult {
                success: false,
                post_url: None,
                message: format!("Error creating post: {}", err),
            }),
            Err(err) => Err(err),
        }
    }
}

pub async fn handle_submit_command(
    options: SubmitOptions,
    client: RedditClient,
) -> Result<(), RedditClientError> {
    match SubmitOperation::new(options, client).execute().await {
        Ok(result) => {
            if result.success {
                info!("{}", result.message);
            } else {
                error!("{}", result.message);
            }
            Ok(())
        }
        Err(err) => {
            error!("Error executing submit operation: {}", err);
            Err(err)
        }
    }
}
