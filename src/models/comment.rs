use super::award::Award;
use super::envelope::{Response, Thing};
use super::id::ThingId;
use super::lenient::{self, Edited, Lenient};
use super::reports::{ModActionInfo, ModReport, Reports, UserReport};
use super::{RedditThing, Submission};
use chrono::{DateTime, Utc};
use log::debug;
use serde::Deserialize;
use serde_json::Value;

/// Direct replies to a comment.
///
/// Reddit sends `""` when there are none and a Listing envelope otherwise.
#[derive(Debug, Clone, Default)]
pub struct Replies(pub Vec<Comment>);

impl Replies {
    pub fn iter(&self) -> impl Iterator<Item = &Comment> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Lenient for Replies {
    fn coerce(value: Value) -> Option<Self> {
        match value {
            Value::String(_) | Value::Null => Some(Replies::default()),
            Value::Object(_) => match Response::from_value(value) {
                Ok(Response::Listing(listing)) => Some(Replies(
                    listing
                        .children
                        .into_iter()
                        .filter_map(|thing| match thing {
                            Thing::Comment(comment) => Some(*comment),
                            _ => None,
                        })
                        .collect(),
                )),
                Ok(_) => None,
                Err(e) => {
                    debug!("dropping undecodable replies: {}", e);
                    None
                }
            },
            _ => None,
        }
    }
}

/// A comment (`t1_`).
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Comment {
    pub id: String,
    pub name: ThingId,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub author: String,
    pub author_fullname: ThingId,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub body: String,
    pub body_html: Option<String>,
    pub permalink: String,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub created_utc: f64,

    // Thread position
    pub link_id: ThingId,
    pub parent_id: ThingId,
    pub link_title: Option<String>,
    pub link_author: Option<String>,
    pub link_permalink: Option<String>,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub depth: u64,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub replies: Replies,

    // Subreddit information
    pub subreddit: String,
    pub subreddit_id: ThingId,
    pub subreddit_name_prefixed: String,
    pub subreddit_type: String,

    // Metrics
    #[serde(deserialize_with = "lenient::deserialize")]
    pub score: i64,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub ups: i64,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub downs: i64,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub controversiality: i64,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub gilded: u64,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub total_awards_received: u64,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub all_awardings: Vec<Award>,

    // Status
    #[serde(deserialize_with = "lenient::deserialize")]
    pub edited: Edited,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub distinguished: Option<String>,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub likes: Option<bool>,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub is_submitter: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub stickied: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub locked: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub archived: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub saved: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub collapsed: bool,
    pub collapsed_reason: Option<String>,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub score_hidden: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub send_replies: bool,

    // Moderation
    #[serde(deserialize_with = "lenient::deserialize")]
    pub removed: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub approved: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub spam: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub ignore_reports: bool,
    pub removal_reason: Option<String>,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub banned_by: Option<String>,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub banned_at_utc: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub approved_by: Option<String>,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub approved_at_utc: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub num_reports: u64,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub user_reports: Vec<UserReport>,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub mod_reports: Vec<ModReport>,
    pub mod_note: Option<String>,
    pub mod_reason_title: Option<String>,
    pub mod_reason_by: Option<String>,

    // Flair
    pub author_flair_text: Option<String>,
    pub author_flair_css_class: Option<String>,
    pub author_flair_background_color: Option<String>,
    pub author_flair_text_color: Option<String>,
}

impl Comment {
    /// One-line rendering used by the CLI.
    pub fn format_short_summary(&self) -> String {
        format!(
            "[{} | {} pts] u/{}: {}",
            self.subreddit_name_prefixed,
            self.score,
            self.author,
            super::post::truncate(&self.body.replace('\n', " "), 120)
        )
    }
}

impl RedditThing for Comment {
    fn id(&self) -> ThingId {
        self.name.clone()
    }

    fn created_at(&self) -> DateTime<Utc> {
        lenient::timestamp(self.created_utc).unwrap_or_default()
    }

    fn url(&self) -> String {
        format!("https://www.reddit.com{}", self.permalink)
    }
}

impl Submission for Comment {
    fn author(&self) -> &str {
        &self.author
    }

    fn author_id(&self) -> &ThingId {
        &self.author_fullname
    }

    fn subreddit(&self) -> &str {
        &self.subreddit
    }

    fn subreddit_id(&self) -> &ThingId {
        &self.subreddit_id
    }

    fn parent_id(&self) -> &ThingId {
        &self.parent_id
    }

    /// Comments carry the title of the post they belong to.
    fn title(&self) -> &str {
        self.link_title.as_deref().unwrap_or_default()
    }

    fn body(&self) -> &str {
        &self.body
    }

    fn score(&self) -> i64 {
        self.score
    }

    fn is_sticky(&self) -> bool {
        self.stickied
    }

    fn is_removed(&self) -> bool {
        self.removed
    }

    fn is_approved(&self) -> bool {
        self.approved
    }

    fn banned(&self) -> ModActionInfo {
        ModActionInfo {
            by: self.banned_by.clone(),
            at: self.banned_at_utc,
        }
    }

    fn approved(&self) -> ModActionInfo {
        ModActionInfo {
            by: self.approved_by.clone(),
            at: self.approved_at_utc,
        }
    }

    fn reports(&self) -> Reports {
        Reports {
            num_reports: self.num_reports,
            user: self.user_reports.clone(),
            moderator: self.mod_reports.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_string_replies_are_empty() {
        let c: Comment = serde_json::from_value(json!({
            "name": "t1_a",
            "body": "hi",
            "replies": "",
            "edited": false
        }))
        .unwrap();
        assert!(c.replies.is_empty());
        assert!(!c.edited.is_edited());
    }

    #[test]
    fn nested_replies_decode_from_listing() {
        let c: Comment = serde_json::from_value(json!({
            "name": "t1_a",
            "parent_id": "t3_p",
            "link_title": "Thread",
            "permalink": "/r/rust/comments/p/thread/a/",
            "replies": {
                "kind": "Listing",
                "data": {
                    "after": null,
                    "before": null,
                    "children": [
                        { "kind": "t1", "data": { "name": "t1_b", "body": "child", "parent_id": "t1_a" } },
                        { "kind": "more", "data": { "count": 3 } }
                    ]
                }
            }
        }))
        .unwrap();

        assert_eq!(c.replies.len(), 1);
        assert_eq!(c.replies.0[0].parent_id(), "t1_a");
        assert_eq!(c.title(), "Thread");
        assert_eq!(c.parent_id(), "t3_p");
        assert_eq!(c.url(), "https://www.reddit.com/r/rust/comments/p/thread/a/");
    }
}
