use super::id::ThingId;
use super::lenient;
use super::RedditThing;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A community (`t5_`), as returned by `/r/{name}/about`.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Subreddit {
    pub id: String,
    pub name: ThingId,
    pub display_name: String,
    pub display_name_prefixed: String,
    pub title: String,
    pub public_description: String,
    pub description: String,
    pub submit_text: String,
    pub url: String,
    pub subreddit_type: String,
    pub lang: String,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub created_utc: f64,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub subscribers: u64,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub active_user_count: u64,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub over18: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub quarantine: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub user_is_moderator: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub user_is_subscriber: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub user_is_banned: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub icon_img: String,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub community_icon: String,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub header_img: String,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub banner_img: String,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub primary_color: String,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub key_color: String,
}

impl RedditThing for Subreddit {
    fn id(&self) -> ThingId {
        self.name.clone()
    }

    fn created_at(&self) -> DateTime<Utc> {
        lenient::timestamp(self.created_utc).unwrap_or_default()
    }

    fn url(&self) -> String {
        format!("https://www.reddit.com{}", self.url)
    }
}
