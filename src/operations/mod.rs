//! Operations behind the CLI subcommands. Each one takes an options struct,
//! runs against a [`RedditClient`] and returns formatted output.

pub mod authorize;
pub mod comments;
pub mod info;
pub mod posts;
pub mod reply;
pub mod stream;
pub mod submit;

use crate::client::{RedditClient, Target};
use crate::models::EntityKind;

/// Resolve a command-line target.
///
/// `r/name` and bare names are subreddits, `u/name` and `/u/name` are
/// redditors, `me` is the logged-in account and fullnames (`t3_...`,
/// `t1_...`) are posts or comments.
pub fn parse_target(client: &RedditClient, raw: &str) -> Target {
    let raw = raw.trim().trim_start_matches('/');
    if raw == "me" {
        return client.target(EntityKind::Redditor, "me");
    }
    if let Some(user) = raw.strip_prefix("u/").or_else(|| raw.strip_prefix("user/")) {
        return client.target(EntityKind::Redditor, user);
    }
    if let Some(sub) = raw.strip_prefix("r/") {
        return client.target(EntityKind::Subreddit, sub);
    }
    match raw.split_once('_').map(|(prefix, _)| EntityKind::from_prefix(prefix)) {
        Some(kind @ (EntityKind::Post | EntityKind::Comment)) => client.target(kind, raw),
        _ => client.target(EntityKind::Subreddit, raw),
    }
}

/// `r/name` display form for a subreddit argument.
pub(crate) fn display_subreddit(subreddit: &str) -> String {
    if subreddit.starts_with("r/") {
        subreddit.to_string()
    } else {
        format!("r/{}", subreddit)
    }
}
