use super::parse_target;
use crate::client::info::Info;
use crate::client::{RedditClient, RedditClientError};
use crate::models::RedditThing;
use chrono_tz::Tz;
use log::error;

#[derive(Debug, Clone)]
pub struct InfoOptions {
    /// `me`, `u/name`, a subreddit or a post/comment fullname
    pub target: String,
    pub zone: Tz,
}

#[derive(Debug)]
pub struct InfoResult {
    pub info: Info,
    pub formatted_output: String,
}

/// Shows about data for one target.
pub struct InfoOperation {
    options: InfoOptions,
    client: RedditClient,
}

impl InfoOperation {
    pub fn new(options: InfoOptions, client: RedditClient) -> Self {
        Self { options, client }
    }

    pub async fn execute(&self) -> Result<InfoResult, RedditClientError> {
        let info = parse_target(&self.client, &self.options.target)
            .info()
            .await?;
        let formatted_output = format_info(&info, &self.options.zone);
        Ok(InfoResult {
            info,
            formatted_output,
        })
    }
}

fn format_info(info: &Info, zone: &Tz) -> String {
    let created = |at: chrono::DateTime<chrono::Utc>| {
        at.with_timezone(zone).format("%Y-%m-%d %H:%M:%S").to_string()
    };
    match info {
        Info::Me(me) => format!(
            "u/{} ({})\nCreated: {}\nKarma: {} link, {} comment\nInbox: {} unread{}\n",
            me.name,
            me.id(),
            created(me.created_at()),
            me.link_karma,
            me.comment_karma,
            me.inbox_count,
            if me.has_mod_mail { ", new modmail" } else { "" }
        ),
        Info::Redditor(user) => format!(
            "u/{} ({})\nCreated: {}\nKarma: {} link, {} comment\n",
            user.name,
            user.id(),
            created(user.created_at()),
            user.link_karma,
            user.comment_karma
        ),
        Info::Subreddit(sr) => format!(
            "{} ({})\n{}\nCreated: {}\nSubscribers: {} | Active: {}\n{}\n",
            sr.display_name_prefixed,
            sr.name,
            sr.title,
            created(sr.created_at()),
            sr.subscribers,
            sr.active_user_count,
            sr.public_description
        ),
        Info::Post(post) => format!(
            "[{}] {}\n{}\n",
            post.format_timestamp(zone),
            post.name,
            post.format_summary()
        ),
        Info::Comment(comment) => format!(
            "[{}] {} on {}\n{}\n{}\n",
            created(comment.created_at()),
            comment.name,
            comment.link_id,
            comment.format_short_summary(),
            comment.url()
        ),
    }
}

pub async fn handle_info_command(
    options: InfoOptions,
    client: RedditClient,
) -> Result<(), RedditClientError> {
    match InfoOperation::new(options, client).execute().await {
        Ok(result) => {
            print!("{}", result.formatted_output);
            Ok(())
        }
        Err(err) => {
            error!("Error fetching info: {}", err);
            Err(err)
        }
    }
}
