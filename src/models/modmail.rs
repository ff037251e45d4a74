//! New modmail conversations (`/api/mod/conversations/{id}`).
//!
//! These payloads use camelCase keys, RFC 3339 dates and numeric author ids,
//! none of which match the rest of the API.

use super::id::ThingId;
use super::lenient;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ModmailAuthor {
    pub id: ThingId,
    pub name: String,
    pub is_mod: bool,
    pub is_admin: bool,
    pub is_op: bool,
    pub is_participant: bool,
    pub is_hidden: bool,
    pub is_deleted: bool,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ModmailOwner {
    pub id: ThingId,
    pub display_name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ModmailObjectId {
    pub id: String,
    pub key: String,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub subject: String,
    pub is_auto: bool,
    pub is_internal: bool,
    pub is_highlighted: bool,
    pub is_repliable: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub state: i64,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub num_messages: u64,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub last_user_update: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub last_mod_update: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub last_unread: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub authors: Vec<ModmailAuthor>,
    pub owner: ModmailOwner,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub obj_ids: Vec<ModmailObjectId>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ModmailMessage {
    pub id: String,
    pub body: String,
    pub body_markdown: String,
    pub author: ModmailAuthor,
    pub is_internal: bool,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub date: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ModmailConversation {
    pub conversation: Conversation,
    pub messages: HashMap<String, ModmailMessage>,
}

impl ModmailConversation {
    /// Messages in the order the conversation lists them.
    pub fn ordered_messages(&self) -> Vec<&ModmailMessage> {
        self.conversation
            .obj_ids
            .iter()
            .filter(|obj| obj.key == "messages")
            .filter_map(|obj| self.messages.get(&obj.id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::id::EntityKind;
    use serde_json::json;

    #[test]
    fn decodes_numeric_author_ids_and_dates() {
        let convo: ModmailConversation = serde_json::from_value(json!({
            "conversation": {
                "id": "abc12",
                "subject": "Ban appeal",
                "numMessages": 2,
                "lastUpdated": "2019-05-07T18:51:18.573911+00:00",
                "lastUnread": null,
                "authors": [{ "name": "user1", "id": 1234567, "isMod": false }],
                "owner": { "displayName": "rust", "type": "subreddit", "id": "t5_2s7lj" },
                "objIds": [
                    { "id": "m2", "key": "messages" },
                    { "id": "m1", "key": "messages" }
                ]
            },
            "messages": {
                "m1": { "id": "m1", "body": "<p>hi</p>", "bodyMarkdown": "hi", "author": { "name": "user1", "id": 1234567 } },
                "m2": { "id": "m2", "body": "<p>yo</p>", "bodyMarkdown": "yo", "author": { "name": "mod", "id": 36, "isMod": true } }
            }
        }))
        .unwrap();

        let author = &convo.conversation.authors[0];
        assert_eq!(author.id, "t2_qglj");
        assert_eq!(author.id.kind(), EntityKind::Redditor);
        assert!(convo.conversation.last_updated.is_some());
        assert!(convo.conversation.last_unread.is_none());

        let ordered = convo.ordered_messages();
        assert_eq!(ordered[0].body_markdown, "yo");
        assert_eq!(ordered[0].author.id, "t2_10");
        assert!(ordered[0].author.is_mod);
    }
}
