use super::lenient;
use serde::Deserialize;

/// An award attached to a post or comment (`all_awardings`).
///
/// Award envelopes (`t6`) are not decoded as standalone things.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Award {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub count: u64,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub coin_price: u64,
    pub icon_url: String,
    pub award_type: String,
}
