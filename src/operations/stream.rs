use super::comments::format_comment_line;
use super::parse_target;
use crate::client::{RedditClient, RedditClientError, SubmissionStream};
use crate::models::{Post, RedditThing};
use chrono_tz::Tz;
use futures::StreamExt;
use log::{error, info, warn};
use std::time::Duration;

/// What a stream follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Posts,
    Comments,
}

#[derive(Debug, Clone)]
pub struct StreamOptions {
    /// Subreddit or `u/name` to follow
    pub target: String,
    pub kind: StreamKind,
    /// Stop after this many items; runs until Ctrl-C otherwise
    pub limit: Option<usize>,
    /// Poll interval; the configured default when unset
    pub interval: Option<Duration>,
    pub zone: Tz,
}

#[derive(Debug)]
pub struct StreamResult {
    /// Items printed before the stream ended
    pub item_count: usize,
}

/// Follows new posts or comments and prints them as they arrive.
pub struct StreamOperation {
    options: StreamOptions,
    client: RedditClient,
}

impl StreamOperation {
    pub fn new(options: StreamOptions, client: RedditClient) -> Self {
        Self { options, client }
    }

    pub async fn execute(&self) -> Result<StreamResult, RedditClientError> {
        let target = parse_target(&self.client, &self.options.target);
        info!(
            "Streaming new {:?} from {} (Ctrl-C to stop)",
            self.options.kind,
            target.name()
        );

        let zone = self.options.zone;
        let item_count = match self.options.kind {
            StreamKind::Posts => {
                let stream = match self.options.interval {
                    Some(interval) => target.stream_posts_every(interval).await?,
                    None => target.stream_posts().await?,
                };
                self.drain(stream, |post: &Post| format_post_line(post, &zone))
                    .await?
            }
            StreamKind::Comments => {
                let stream = match self.options.interval {
                    Some(interval) => target.stream_comments_every(interval).await?,
                    None => target.stream_comments().await?,
                };
                self.drain(stream, |comment| format_comment_line(comment, &zone))
                    .await?
            }
        };
        Ok(StreamResult { item_count })
    }

    /// Print items until the limit, Ctrl-C, or a stream error.
    async fn drain<T, F>(
        &self,
        mut stream: SubmissionStream<T>,
        render: F,
    ) -> Result<usize, RedditClientError>
    where
        F: Fn(&T) -> String,
    {
        let mut count = 0;
        while self.options.limit.map_or(true, |limit| count < limit) {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupted, closing stream");
                    break;
                }
                next = stream.next() => match next {
                    Some(Ok(item)) => {
                        println!("{}", render(&item));
                        count += 1;
                    }
                    Some(Err(err)) => {
                        warn!("Stream ended with an error after {} items", count);
                        return Err(err);
                    }
                    None => break,
                },
            }
        }
        stream.close();
        Ok(count)
    }
}

fn format_post_line(post: &Post, zone: &Tz) -> String {
    format!(
        "[{}] {} {}",
        post.format_timestamp(zone),
        post.id(),
        post.format_short_summary()
    )
}

pub async fn handle_stream_command(
    options: StreamOptions,
    client: RedditClient,
) -> Result<(), RedditClientError> {
    match StreamOperation::new(options, client).execute().await {
        Ok(result) => {
            info!("Stream finished after {} items", result.item_count);
            Ok(())
        }
        Err(err) => {
            error!("Stream failed: {}", err);
            Err(err)
        }
    }
}
