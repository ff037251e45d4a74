use super::id::{EntityKind, ThingId};
use super::lenient;
use super::RedditThing;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// The authenticated account, from `/api/v1/me`.
///
/// Unlike listing data this payload is not wrapped in an envelope.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Me {
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
    pub has_mail: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub has_mod_mail: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub inbox_count: u64,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub is_mod: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub is_gold: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub is_employee: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub verified: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub over_18: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub icon_img: String,
}

impl RedditThing for Me {
    fn id(&self) -> ThingId {
        ThingId::new(EntityKind::Redditor, &self.id)
    }

    fn created_at(&self) -> DateTime<Utc> {
        lenient::timestamp(self.created_utc).unwrap_or_default()
    }

    fn url(&self) -> String {
        format!("https://www.reddit.com/u/{}", self.name)
    }
}
