use super::award::Award;
use super::id::ThingId;
use super::lenient::{self, Edited};
use super::reports::{ModActionInfo, ModReport, Reports, UserReport};
use super::{RedditThing, Submission};
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Preview images in post
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Preview {
    pub images: Vec<PreviewImage>,
    pub enabled: bool,
}

/// Image data in post preview
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct PreviewImage {
    pub source: ImageSource,
    pub resolutions: Vec<ImageSource>,
    pub variants: HashMap<String, Value>,
    pub id: String,
}

/// Image source data with dimensions and URL
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ImageSource {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

/// A link or self post (`t3_`).
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Post {
    // Basic post information
    pub id: String,
    pub name: ThingId,
    pub title: String,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub author: String,
    pub author_fullname: ThingId,
    pub permalink: String,
    pub url: String,
    pub domain: String,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub created_utc: f64,

    // Post type and content
    pub is_self: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub selftext: String,
    pub selftext_html: Option<String>,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub is_video: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub is_original_content: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub is_meta: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub is_crosspostable: bool,
    pub post_hint: Option<String>,

    // Media-related fields
    #[serde(deserialize_with = "lenient::deserialize")]
    pub thumbnail: String,
    pub thumbnail_width: Option<u32>,
    pub thumbnail_height: Option<u32>,
    pub media: Option<Value>,
    pub secure_media: Option<Value>,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub media_embed: Option<Map<String, Value>>,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub secure_media_embed: Option<Map<String, Value>>,
    pub preview: Option<Preview>,

    // Post metrics
    #[serde(deserialize_with = "lenient::deserialize")]
    pub score: i64,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub upvote_ratio: f64,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub ups: i64,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub downs: i64,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub num_comments: u64,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub num_crossposts: u64,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub total_awards_received: u64,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub gilded: u64,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub all_awardings: Vec<Award>,

    // Subreddit information
    pub subreddit: String,
    pub subreddit_id: ThingId,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub subreddit_subscribers: u64,
    pub subreddit_type: String,
    pub subreddit_name_prefixed: String,

    // Post status and moderation
    #[serde(deserialize_with = "lenient::deserialize")]
    pub archived: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub locked: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub hidden: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub saved: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub stickied: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub pinned: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub spoiler: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub over_18: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub quarantine: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub removed: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub approved: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub spam: bool,
    pub removed_by_category: Option<String>,
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

    // Flags and display options
    #[serde(deserialize_with = "lenient::deserialize")]
    pub hide_score: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub contest_mode: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub edited: Edited,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub distinguished: Option<String>,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub likes: Option<bool>,
    pub suggested_sort: Option<String>,

    // Flair information
    pub link_flair_text: Option<String>,
    pub link_flair_type: Option<String>,
    pub link_flair_css_class: Option<String>,
    pub link_flair_background_color: Option<String>,
    pub link_flair_text_color: Option<String>,
    pub author_flair_text: Option<String>,
    pub author_flair_type: Option<String>,
    pub author_flair_css_class: Option<String>,
    pub author_flair_background_color: Option<String>,
    pub author_flair_text_color: Option<String>,
}

impl Post {
    /// Format a post for display with important metadata
    pub fn format_summary(&self) -> String {
        let mut content = format!(
            "Title: {}\nAuthor: u/{}\nSubreddit: r/{}\nScore: {} ({}% upvoted) | Comments: {}\n",
            self.title,
            self.author,
            self.subreddit,
            self.score,
            (self.upvote_ratio * 100.0).round() as i64,
            self.num_comments,
        );

        // Add post type indicators
        let mut flags = Vec::new();
        if self.is_self {
            flags.push("Self Post");
        }
        if self.over_18 {
            flags.push("NSFW");
        }
        if self.spoiler {
            flags.push("Spoiler");
        }
        if self.is_video {
            flags.push("Video");
        }
        if self.is_original_content {
            flags.push("OC");
        }
        if self.stickied {
            flags.push("Stickied");
        }
        if self.locked {
            flags.push("Locked");
        }
        if self.edited.is_edited() {
            flags.push("Edited");
        }
        if !flags.is_empty() {
            content.push_str(&format!("Flags: [{}]\n", flags.join(", ")));
        }

        if let Some(flair) = self.link_flair_text.as_deref().filter(|f| !f.is_empty()) {
            content.push_str(&format!("Flair: {}\n", flair));
        }

        // For text posts, include the text (truncated if long)
        if self.is_self && !self.selftext.is_empty() {
            content.push_str("\nContent:\n---------\n");
            content.push_str(&truncate(&self.selftext, 500));
            content.push_str("\n---------\n");
        }

        content.push_str(&format!(
            "\nPermalink: https://reddit.com{}",
            self.permalink
        ));
        if !self.is_self && self.url != format!("https://reddit.com{}", self.permalink) {
            content.push_str(&format!("\nExternal URL: {}", self.url));
        }

        content
    }

    /// Get a short summary for the post (title, author, score)
    pub fn format_short_summary(&self) -> String {
        format!(
            "[{} | {} pts] {} - by u/{}",
            self.subreddit_name_prefixed, self.score, self.title, self.author
        )
    }

    /// Format the creation time in the given zone
    pub fn format_timestamp<Tz: TimeZone>(&self, zone: &Tz) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        self.created_at()
            .with_timezone(zone)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
    }
}

/// Truncate on a char boundary, appending an ellipsis when shortened.
pub(crate) fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let mut out: String = text.chars().take(max_chars).collect();
        out.push_str("...");
        out
    } else {
        text.to_string()
    }
}

impl RedditThing for Post {
    fn id(&self) -> ThingId {
        self.name.clone()
    }

    fn created_at(&self) -> DateTime<Utc> {
        lenient::timestamp(self.created_utc).unwrap_or_default()
    }

    fn url(&self) -> String {
        self.url.clone()
    }
}

impl Submission for Post {
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

    /// Posts hang directly off their subreddit.
    fn parent_id(&self) -> &ThingId {
        &self.subreddit_id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn body(&self) -> &str {
        &self.selftext
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
    fn decodes_inconsistent_listing_fields() {
        let post: Post = serde_json::from_value(json!({
            "id": "abcd12",
            "name": "t3_abcd12",
            "title": "Hello",
            "author": "someone",
            "author_fullname": "t2_xyz",
            "created_utc": 1_700_000_000.0,
            "is_self": true,
            "selftext": "body",
            "edited": 1_700_000_100,
            "distinguished": null,
            "banned_by": true,
            "media_embed": [],
            "secure_media_embed": {},
            "score": 42,
            "upvote_ratio": 0.97,
            "user_reports": [["spam", 2]],
            "link_flair_text": null,
            "subreddit": "rust",
            "subreddit_id": "t5_2s7lj"
        }))
        .unwrap();

        assert_eq!(post.id(), "t3_abcd12");
        assert_eq!(post.created_at().timestamp(), 1_700_000_000);
        assert!(post.edited.is_edited());
        assert_eq!(post.banned().by.as_deref(), Some("true"));
        assert!(post.media_embed.is_none());
        assert_eq!(post.reports().user[0].count, 2);
        assert_eq!(post.parent_id(), "t5_2s7lj");
        assert!(post.format_short_summary().contains("42 pts"));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé...");
        assert_eq!(truncate("short", 10), "short");
    }
}
