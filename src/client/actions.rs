//! Write operations. Each issues one POST with `api_type=json`; errors
//! reported in `json.errors` become [`RedditClientError::ApiError`].

use super::{RedditClient, RedditClientError, Result, Target};
use crate::models::{ActionResponse, EntityKind};
use log::debug;

const SUBMISSIONS: &[EntityKind] = &[EntityKind::Comment, EntityKind::Post];

/// An action endpoint and the targets it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Submit,
    Reply,
    Delete,
    Edit,
    Approve,
    Remove,
    Distinguish,
    SelectFlair,
    UserFlair,
    UpdateSidebar,
    Ban,
    Compose,
    ReadMessage,
    ReadAllMessages,
}

impl Action {
    pub fn name(self) -> &'static str {
        match self {
            Action::Submit => "submit",
            Action::Reply => "reply",
            Action::Delete => "delete",
            Action::Edit => "edit",
            Action::Approve => "approve",
            Action::Remove => "remove",
            Action::Distinguish => "distinguish",
            Action::SelectFlair => "select_flair",
            Action::UserFlair => "user_flair",
            Action::UpdateSidebar => "update_sidebar",
            Action::Ban => "ban",
            Action::Compose => "compose",
            Action::ReadMessage => "read_message",
            Action::ReadAllMessages => "read_all_messages",
        }
    }

    pub fn targets(self) -> &'static [EntityKind] {
        match self {
            Action::Submit | Action::UserFlair | Action::UpdateSidebar | Action::Ban => {
                &[EntityKind::Subreddit]
            }
            Action::Reply | Action::Delete | Action::Edit | Action::Approve | Action::Remove => {
                SUBMISSIONS
            }
            Action::Distinguish => &[EntityKind::Comment],
            Action::SelectFlair => &[EntityKind::Post],
            Action::Compose | Action::ReadMessage | Action::ReadAllMessages => {
                &[EntityKind::Redditor]
            }
        }
    }

    /// Read-message actions only apply to the logged-in account.
    fn requires_me(self) -> bool {
        matches!(self, Action::ReadMessage | Action::ReadAllMessages)
    }

    fn path(self, target: &str) -> String {
        match self {
            Action::Submit => "/api/submit".to_string(),
            Action::Reply => "/api/comment".to_string(),
            Action::Delete => "/api/del".to_string(),
            Action::Edit => "/api/editusertext".to_string(),
            Action::Approve => "/api/approve".to_string(),
            Action::Remove => "/api/remove".to_string(),
            Action::Distinguish => "/api/distinguish".to_string(),
            Action::SelectFlair => "/api/selectflair".to_string(),
            Action::UserFlair => format!("/r/{}/api/flair", target),
            Action::UpdateSidebar => "/api/site_admin".to_string(),
            Action::Ban => format!("/r/{}/api/friend", target),
            Action::Compose => "/api/compose".to_string(),
            Action::ReadMessage => "/api/read_message".to_string(),
            Action::ReadAllMessages => "/api/read_all_messages".to_string(),
        }
    }
}

impl RedditClient {
    /// POST an action with `api_type=json` and check `json.errors`.
    pub(crate) async fn execute_path(
        &self,
        path: &str,
        mut params: Vec<(&str, String)>,
    ) -> Result<ActionResponse> {
        params.push(("api_type", "json".to_string()));
        let value = self.post_form(path, &params).await?;
        let response = ActionResponse::from_value(value)?;
        if let Some(first) = response.errors.first() {
            debug!("{} returned errors: {:?}", path, response.errors);
            let message = response
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(RedditClientError::ApiError {
                message,
                error: first.code.clone(),
            });
        }
        Ok(response)
    }

    /// Submit a self post to the next queued subreddit.
    pub async fn submit(&self, title: &str, text: &str) -> Result<ActionResponse> {
        self.selected_for(Action::Submit.name(), Action::Submit.targets())
            .await?
            .submit(title, text)
            .await
    }

    /// Reply to the next queued post or comment.
    pub async fn reply(&self, text: &str) -> Result<ActionResponse> {
        self.selected_for(Action::Reply.name(), Action::Reply.targets())
            .await?
            .reply(text)
            .await
    }

    /// Reply to any thing by id, without selecting it.
    pub async fn reply_to(&self, thing_id: &str, text: &str) -> Result<ActionResponse> {
        self.execute_path(
            &Action::Reply.path(thing_id),
            vec![("thing_id", thing_id.to_string()), ("text", text.to_string())],
        )
        .await
    }
}

impl Target {
    /// Run `action` against this target with extra form parameters.
    pub async fn execute(
        &self,
        action: Action,
        params: Vec<(&str, String)>,
    ) -> Result<ActionResponse> {
        let name = self.check(action.name(), action.targets())?;
        if action.requires_me() {
            self.check_me(action.name())?;
        }
        self.client.execute_path(&action.path(name), params).await
    }

    pub async fn submit(&self, title: &str, text: &str) -> Result<ActionResponse> {
        self.execute(
            Action::Submit,
            vec![
                ("sr", self.name().to_string()),
                ("title", title.to_string()),
                ("text", text.to_string()),
                ("kind", "self".to_string()),
                ("resubmit", "true".to_string()),
            ],
        )
        .await
    }

    pub async fn reply(&self, text: &str) -> Result<ActionResponse> {
        self.execute(
            Action::Reply,
            vec![("thing_id", self.name().to_string()), ("text", text.to_string())],
        )
        .await
    }

    pub async fn delete(&self) -> Result<ActionResponse> {
        self.execute(Action::Delete, vec![("id", self.name().to_string())])
            .await
    }

    pub async fn edit(&self, text: &str) -> Result<ActionResponse> {
        self.execute(
            Action::Edit,
            vec![("thing_id", self.name().to_string()), ("text", text.to_string())],
        )
        .await
    }

    pub async fn approve(&self) -> Result<ActionResponse> {
        self.execute(Action::Approve, vec![("id", self.name().to_string())])
            .await
    }

    /// Mod-remove this post or comment. Use [`Target::delete`] for your own.
    pub async fn remove(&self, spam: bool) -> Result<ActionResponse> {
        self.execute(
            Action::Remove,
            vec![("id", self.name().to_string()), ("spam", spam.to_string())],
        )
        .await
    }

    pub async fn distinguish(&self, how: &str, sticky: bool) -> Result<ActionResponse> {
        self.execute(
            Action::Distinguish,
            vec![
                ("id", self.name().to_string()),
                ("how", how.to_string()),
                ("sticky", sticky.to_string()),
            ],
        )
        .await
    }

    pub async fn select_flair(&self, text: &str) -> Result<ActionResponse> {
        self.execute(
            Action::SelectFlair,
            vec![("link", self.name().to_string()), ("text", text.to_string())],
        )
        .await
    }

    pub async fn user_flair(&self, user: &str, text: &str) -> Result<ActionResponse> {
        self.execute(
            Action::UserFlair,
            vec![("name", user.to_string()), ("text", text.to_string())],
        )
        .await
    }

    pub async fn update_sidebar(&self, text: &str) -> Result<ActionResponse> {
        self.execute(
            Action::UpdateSidebar,
            vec![
                ("sr", self.name().to_string()),
                ("name", "None".to_string()),
                ("description", text.to_string()),
                ("title", self.name().to_string()),
                ("wikimode", "anyone".to_string()),
                ("link_type", "any".to_string()),
                ("type", "public".to_string()),
            ],
        )
        .await
    }

    pub async fn ban(
        &self,
        user: &str,
        days: u32,
        context: &str,
        message: &str,
        reason: &str,
    ) -> Result<ActionResponse> {
        self.execute(
            Action::Ban,
            vec![
                ("name", user.to_string()),
                ("duration", days.to_string()),
                ("ban_context", context.to_string()),
                ("ban_message", message.to_string()),
                ("ban_reason", reason.to_string()),
                ("note", reason.to_string()),
                ("type", "banned".to_string()),
            ],
        )
        .await
    }

    /// Send a private message to this redditor.
    pub async fn compose(&self, subject: &str, text: &str) -> Result<ActionResponse> {
        self.execute(
            Action::Compose,
            vec![
                ("to", self.name().to_string()),
                ("subject", subject.to_string()),
                ("text", text.to_string()),
            ],
        )
        .await
    }

    pub async fn read_message(&self, message_id: &str) -> Result<ActionResponse> {
        self.execute(Action::ReadMessage, vec![("id", message_id.to_string())])
            .await
    }

    pub async fn read_all_messages(&self) -> Result<ActionResponse> {
        self.execute(Action::ReadAllMessages, Vec::new()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_targets_follow_endpoint_rules() {
        assert_eq!(Action::Submit.targets(), &[EntityKind::Subreddit]);
        assert_eq!(Action::Distinguish.targets(), &[EntityKind::Comment]);
        assert_eq!(Action::SelectFlair.targets(), &[EntityKind::Post]);
        assert!(Action::Delete.targets().contains(&EntityKind::Post));
        assert!(Action::Delete.targets().contains(&EntityKind::Comment));
        assert_eq!(Action::Ban.path("rust"), "/r/rust/api/friend");
        assert_eq!(Action::UserFlair.path("rust"), "/r/rust/api/flair");
        assert!(Action::ReadAllMessages.requires_me());
        assert!(!Action::Compose.requires_me());
    }
}
