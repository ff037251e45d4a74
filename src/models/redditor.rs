use super::envelope::Thing;
use super::id::{EntityKind, ThingId};
use super::lenient::{self, Lenient};
use super::RedditThing;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// The profile subreddit embedded in a redditor's about data.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ProfileSubreddit {
    pub display_name: String,
    pub title: String,
    pub public_description: String,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub subscribers: u64,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub over_18: bool,
    pub url: String,
}

/// A user account (`t2_`).
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Redditor {
    pub id: String,
    pub name: String,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub created_utc: f64,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub link_karma: i64,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub comment_karma: i64,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub total_karma: i64,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub is_employee: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub is_friend: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub is_gold: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub is_mod: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub verified: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub has_verified_email: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub icon_img: String,
    pub subreddit: Option<ProfileSubreddit>,
}

impl RedditThing for Redditor {
    fn id(&self) -> ThingId {
        ThingId::new(EntityKind::Redditor, &self.id)
    }

    fn created_at(&self) -> DateTime<Utc> {
        lenient::timestamp(self.created_utc).unwrap_or_default()
    }

    fn url(&self) -> String {
        format!("https://www.reddit.com/user/{}", self.name)
    }
}

/// A nested `t2` envelope, as found in `revision_by` on wiki pages.
impl Lenient for Option<Redditor> {
    fn coerce(value: Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            Value::Object(_) => match Thing::from_value(value) {
                Ok(Thing::Redditor(redditor)) => Some(Some(*redditor)),
                _ => None,
            },
            _ => None,
        }
    }
}
