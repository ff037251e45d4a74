use super::id::ThingId;
use super::lenient;
use super::RedditThing;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// An entry of a subreddit's moderation log (`modaction`).
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ModAction {
    pub id: String,
    pub action: String,
    #[serde(rename = "mod")]
    pub moderator: String,
    pub mod_id36: String,
    pub description: Option<String>,
    pub details: Option<String>,
    pub subreddit: String,
    pub sr_id36: String,
    pub target_author: Option<String>,
    pub target_fullname: Option<ThingId>,
    pub target_title: Option<String>,
    pub target_body: Option<String>,
    pub target_permalink: Option<String>,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub created_utc: f64,
}

impl RedditThing for ModAction {
    /// Mod log ids already carry their `ModAction_` prefix.
    fn id(&self) -> ThingId {
        ThingId::from(self.id.as_str())
    }

    fn created_at(&self) -> DateTime<Utc> {
        lenient::timestamp(self.created_utc).unwrap_or_default()
    }

    fn url(&self) -> String {
        format!(
            "https://www.reddit.com{}",
            self.target_permalink.as_deref().unwrap_or_default()
        )
    }
}
