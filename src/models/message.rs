use super::id::ThingId;
use super::lenient;
use super::RedditThing;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A private message or inbox item (`t4_`).
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Message {
    pub id: String,
    pub name: ThingId,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub author: String,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub dest: String,
    pub subject: String,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub body: String,
    pub body_html: Option<String>,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub context: String,
    pub parent_id: Option<ThingId>,
    pub first_message_name: Option<ThingId>,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub subreddit: Option<String>,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub distinguished: Option<String>,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub new: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub was_comment: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub created_utc: f64,
}

impl RedditThing for Message {
    fn id(&self) -> ThingId {
        self.name.clone()
    }

    fn created_at(&self) -> DateTime<Utc> {
        lenient::timestamp(self.created_utc).unwrap_or_default()
    }

    /// Comment replies link to their context; plain messages to the inbox.
    fn url(&self) -> String {
        if self.context.is_empty() {
            format!("https://www.reddit.com/message/messages/{}", self.id)
        } else {
            format!("https://www.reddit.com{}", self.context)
        }
    }
}
