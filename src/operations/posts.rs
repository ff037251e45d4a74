use super::parse_target;
use crate::client::{RedditClient, RedditClientError, Sort, TimeWindow};
use crate::models::post::truncate;
use crate::models::{Post, RedditThing};
use chrono_tz::Tz;
use log::{error, info};

/// Inputs for the `posts` command.
#[derive(Debug, Clone)]
pub struct PostsOptions {
    /// Subreddit (`rust`, `r/rust`, `rust+golang`) or redditor (`u/name`)
    pub target: String,
    /// Page size sent as `limit`
    pub count: u32,
    pub sort: Sort,
    pub window: TimeWindow,
    /// One line per post instead of the full summary
    pub brief: bool,
    /// Zone used to render timestamps
    pub zone: Tz,
}

impl Default for PostsOptions {
    fn default() -> Self {
        Self {
            target: "all".to_string(),
            count: 10,
            sort: Sort::New,
            window: TimeWindow::All,
            brief: false,
            zone: chrono_tz::America::Los_Angeles,
        }
    }
}

/// Posts fetched for a target, plus their rendering.
#[derive(Debug)]
pub struct PostsResult {
    pub post_count: usize,
    /// Text printed by the CLI
    pub formatted_output: String,
    pub posts: Vec<Post>,
}

/// Operation for fetching posts from a subreddit or redditor
pub struct PostsOperation {
    options: PostsOptions,
    client: RedditClient,
}

impl PostsOperation {
    pub fn new(options: PostsOptions, client: RedditClient) -> Self {
        Self { options, client }
    }

    pub async fn execute(&self) -> Result<PostsResult, RedditClientError> {
        info!(
            "Fetching {} {} posts from {}",
            self.options.count, self.options.sort, self.options.target
        );

        let target = parse_target(&self.client, &self.options.target);
        let page = target
            .posts(self.options.sort, self.options.window, self.options.count)
            .await?;

        let mut output = String::new();
        if page.items.is_empty() {
            output.push_str("No posts found.\n");
        } else {
            output.push_str(&format!("Found {} posts\n", page.items.len()));
            if self.options.brief {
                self.format_brief_output(&page.items, &mut output);
                output.push_str(LEGEND);
            } else {
                self.format_detailed_output(&page.items, &mut output);
            }
        }
        if let Some(after) = &page.after {
            output.push_str(&format!("\nNext page after: {}\n", after));
        }

        Ok(PostsResult {
            post_count: page.items.len(),
            formatted_output: output,
            posts: page.items,
        })
    }

    fn format_brief_output(&self, posts: &[Post], output: &mut String) {
        for (i, post) in posts.iter().enumerate() {
            let time = post
                .created_at()
                .with_timezone(&self.options.zone)
                .format("%H:%M");
            output.push_str(&format!(
                "{:2}. [{}] [{}] {} ({}) r/{} | ID: {} | {}\n",
                i + 1,
                post_type(post),
                time,
                truncate(&post.title, 30),
                excerpt(post),
                post.subreddit,
                post.name,
                post.url()
            ));
        }
    }

    fn format_detailed_output(&self, posts: &[Post], output: &mut String) {
        for post in posts {
            output.push_str("\n============ POST =============\n");
            output.push_str(&format!(
                "[{}] [{}]\n",
                post.format_timestamp(&self.options.zone),
                self.options.zone.name()
            ));
            output.push_str(&format!("Thing ID: {} (use this for replying)\n", post.name));
            output.push_str(&post.format_summary());
            output.push_str("\n================================\n\n");
        }
    }
}

const LEGEND: &str = "\nLegend: [T] text  [V] video  [I] image  [G] gallery  [L] link\n";

/// Single-letter post type used in brief listings.
pub(crate) fn post_type(post: &Post) -> &'static str {
    if post.is_self {
        "T"
    } else if post.is_video {
        "V"
    } else if post.url.contains("i.redd.it") || post.url.contains("imgur.com") {
        "I"
    } else if post.url.contains("reddit.com/gallery") {
        "G"
    } else {
        "L"
    }
}

/// Quoted text excerpt for self posts, shortened link otherwise.
fn excerpt(post: &Post) -> String {
    if post.is_self {
        let text = post.selftext.trim();
        if text.is_empty() {
            "[No content]".to_string()
        } else {
            format!("\"{}\"", truncate(&text.replace('\n', " "), 30))
        }
    } else {
        let url = post
            .url
            .strip_prefix("https://")
            .or_else(|| post.url.strip_prefix("http://"))
            .unwrap_or(&post.url);
        truncate(url, 30)
    }
}

/// Entry point used by `main` for `posts`.
pub async fn handle_posts_command(
    options: PostsOptions,
    client: RedditClient,
) -> Result<(), RedditClientError> {
    match PostsOperation::new(options, client).execute().await {
        Ok(result) => {
            print!("{}", result.formatted_output);
            Ok(())
        }
        Err(err) => {
            error!("Error fetching posts: {}", err);
            Err(err)
        }
    }
}
