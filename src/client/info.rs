//! Read operations on a single target: about pages, moderation data, wiki,
//! inbox and modmail.

use super::{RedditClient, RedditClientError, Result, Target};
use crate::models::{
    Comment, DecodeError, EntityKind, Envelope, ListingPage, Me, ModAction, ModmailConversation,
    Post, PostOrComment, Redditor, Response, Stylesheet, Subreddit, Thing, ThingId, Wiki,
};

/// What [`Target::info`] resolves to.
#[derive(Debug, Clone)]
pub enum Info {
    Me(Box<Me>),
    Post(Box<Post>),
    Comment(Box<Comment>),
    Subreddit(Box<Subreddit>),
    Redditor(Box<Redditor>),
}

const INFO_TARGETS: &[EntityKind] = &[
    EntityKind::Redditor,
    EntityKind::Post,
    EntityKind::Comment,
    EntityKind::Subreddit,
];

impl RedditClient {
    /// Look up a post or comment by fullname, dispatching on its prefix.
    pub async fn submission_info_id(&self, id: &ThingId) -> Result<PostOrComment> {
        match id.kind() {
            EntityKind::Post | EntityKind::Comment => {
                let thing = self.thing_by_id(id).await?;
                match thing {
                    Thing::Post(post) => Ok(PostOrComment::Post(post)),
                    Thing::Comment(comment) => Ok(PostOrComment::Comment(comment)),
                    other => Err(RedditClientError::InvalidTarget {
                        operation: "submission_info",
                        expected: vec![EntityKind::Post, EntityKind::Comment],
                        found: other.kind(),
                    }),
                }
            }
            kind => Err(RedditClientError::InvalidTarget {
                operation: "submission_info",
                expected: vec![EntityKind::Post, EntityKind::Comment],
                found: kind,
            }),
        }
    }

    /// `/api/info.json?id=` for one fullname.
    async fn thing_by_id(&self, id: &ThingId) -> Result<Thing> {
        let page: ListingPage<Thing> = self
            .listing("/api/info.json", &[("id", id.to_string())])
            .await?;
        page.items
            .into_iter()
            .next()
            .ok_or_else(|| RedditClientError::NoResults(id.to_string()))
    }

    /// About data for the next queued target.
    pub async fn info(&self) -> Result<Info> {
        self.selected_for("info", INFO_TARGETS).await?.info().await
    }

    /// A new-modmail conversation by id.
    pub async fn modmail_conversation(
        &self,
        conversation_id: &str,
        mark_read: bool,
    ) -> Result<ModmailConversation> {
        let value = self
            .get(
                &format!("/api/mod/conversations/{}", conversation_id),
                &[("markRead", mark_read.to_string())],
            )
            .await?;
        Ok(serde_json::from_value(value)?)
    }
}

fn unexpected(operation: &'static str, expected: EntityKind, thing: &Thing) -> RedditClientError {
    RedditClientError::InvalidTarget {
        operation,
        expected: vec![expected],
        found: thing.kind(),
    }
}

impl Target {
    /// About data: `/api/v1/me` for the logged-in account, `/api/info` for
    /// posts and comments, the about page for subreddits and redditors.
    pub async fn info(&self) -> Result<Info> {
        let name = self.check("info", INFO_TARGETS)?;
        match self.kind() {
            EntityKind::Redditor if name == "me" => {
                let value = self.client.get("/api/v1/me", &[]).await?;
                Ok(Info::Me(Box::new(serde_json::from_value(value)?)))
            }
            EntityKind::Redditor => {
                let value = self.client.get(&format!("/user/{}/about", name), &[]).await?;
                match Thing::from_value(value)? {
                    Thing::Redditor(redditor) => Ok(Info::Redditor(redditor)),
                    other => Err(unexpected("info", EntityKind::Redditor, &other)),
                }
            }
            EntityKind::Subreddit => {
                let value = self.client.get(&format!("/r/{}/about", name), &[]).await?;
                match Thing::from_value(value)? {
                    Thing::Subreddit(subreddit) => Ok(Info::Subreddit(subreddit)),
                    other => Err(unexpected("info", EntityKind::Subreddit, &other)),
                }
            }
            _ => match self.client.thing_by_id(&ThingId::from(name)).await? {
                Thing::Post(post) if self.kind() == EntityKind::Post => Ok(Info::Post(post)),
                Thing::Comment(comment) if self.kind() == EntityKind::Comment => {
                    Ok(Info::Comment(comment))
                }
                other => Err(unexpected("info", self.kind(), &other)),
            },
        }
    }

    /// The post a comment belongs to.
    pub async fn parent_post(&self) -> Result<ThingId> {
        let name = self.check("parent_post", &[EntityKind::Comment])?;
        match self.client.thing_by_id(&ThingId::from(name)).await? {
            Thing::Comment(comment) => Ok(comment.link_id),
            other => Err(unexpected("parent_post", EntityKind::Comment, &other)),
        }
    }

    /// Posts and comments awaiting moderation.
    pub async fn mod_queue(&self, limit: u32) -> Result<ListingPage<PostOrComment>> {
        let name = self.check("mod_queue", &[EntityKind::Subreddit])?;
        self.client
            .listing(
                &format!("/r/{}/about/modqueue.json", name),
                &[("limit", limit.to_string())],
            )
            .await
    }

    /// Moderation log, optionally filtered to one moderator.
    pub async fn mod_log(
        &self,
        limit: u32,
        moderator: Option<&str>,
    ) -> Result<ListingPage<ModAction>> {
        let name = self.check("mod_log", &[EntityKind::Subreddit])?;
        let mut params = vec![("limit", limit.to_string())];
        if let Some(moderator) = moderator {
            params.push(("mod", moderator.to_string()));
        }
        self.client
            .listing(&format!("/r/{}/about/log.json", name), &params)
            .await
    }

    pub async fn wiki(&self, page: &str) -> Result<Wiki> {
        let name = self.check("wiki", &[EntityKind::Subreddit])?;
        match self
            .client
            .get_response(&format!("/r/{}/wiki/{}.json", name, page), &[])
            .await?
        {
            Response::Wiki(wiki) => Ok(*wiki),
            other => Err(DecodeError::UnknownKind(other.kind().to_string()).into()),
        }
    }

    pub async fn stylesheet(&self) -> Result<Stylesheet> {
        let name = self.check("stylesheet", &[EntityKind::Subreddit])?;
        match self
            .client
            .get_response(&format!("/r/{}/about/stylesheet.json", name), &[])
            .await?
        {
            Response::Stylesheet(stylesheet) => Ok(*stylesheet),
            other => Err(DecodeError::UnknownKind(other.kind().to_string()).into()),
        }
    }

    /// Unread inbox items without marking them read. The inbox mixes
    /// messages and comment replies.
    pub async fn unread_messages(&self) -> Result<ListingPage<Thing>> {
        self.check_me("unread_messages")?;
        self.client
            .listing("/message/unread", &[("mark", "false".to_string())])
            .await
    }
}

impl Info {
    pub fn kind(&self) -> EntityKind {
        match self {
            Info::Me(_) | Info::Redditor(_) => EntityKind::Redditor,
            Info::Post(_) => EntityKind::Post,
            Info::Comment(_) => EntityKind::Comment,
            Info::Subreddit(_) => EntityKind::Subreddit,
        }
    }

    /// Wrap a standalone envelope as about data.
    pub fn from_envelope(envelope: Envelope) -> Result<Self> {
        Ok(match Thing::decode(envelope)? {
            Thing::Post(post) => Info::Post(post),
            Thing::Comment(comment) => Info::Comment(comment),
            Thing::Subreddit(subreddit) => Info::Subreddit(subreddit),
            Thing::Redditor(redditor) => Info::Redditor(redditor),
            other => {
                return Err(RedditClientError::InvalidTarget {
                    operation: "info",
                    expected: INFO_TARGETS.to_vec(),
                    found: other.kind(),
                })
            }
        })
    }
}
