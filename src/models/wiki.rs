use super::id::ThingId;
use super::lenient;
use super::redditor::Redditor;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A wiki page (`wikipage` envelope).
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Wiki {
    pub content_md: String,
    pub content_html: String,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub may_revise: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub reason: Option<String>,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub revision_date: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub revision_by: Option<Redditor>,
    pub revision_id: String,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct StylesheetImage {
    pub url: String,
    pub link: String,
    pub name: String,
}

/// A subreddit stylesheet (`stylesheet` envelope).
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Stylesheet {
    #[serde(deserialize_with = "lenient::deserialize")]
    pub images: Vec<StylesheetImage>,
    pub subreddit_id: ThingId,
    pub stylesheet: String,
}
