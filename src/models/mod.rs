//! Typed records for everything the API returns.

pub mod action;
pub mod award;
pub mod comment;
pub mod envelope;
pub mod id;
pub mod lenient;
pub mod me;
pub mod message;
pub mod modaction;
pub mod modmail;
pub mod post;
pub mod redditor;
pub mod reports;
pub mod subreddit;
pub mod wiki;

pub use action::{ActionError, ActionResponse};
pub use award::Award;
pub use comment::{Comment, Replies};
pub use envelope::{DecodeError, Envelope, FromThing, Listing, ListingPage, Response, Thing};
pub use id::{EntityKind, ThingId};
pub use lenient::Edited;
pub use me::Me;
pub use message::Message;
pub use modaction::ModAction;
pub use modmail::ModmailConversation;
pub use post::Post;
pub use redditor::Redditor;
pub use reports::{ModActionInfo, ModReport, Reports, UserReport};
pub use subreddit::Subreddit;
pub use wiki::{Stylesheet, Wiki};

use chrono::{DateTime, Utc};

/// Accessors shared by every entity.
pub trait RedditThing {
    fn id(&self) -> ThingId;
    fn created_at(&self) -> DateTime<Utc>;
    fn url(&self) -> String;
}

/// Accessors shared by posts and comments.
pub trait Submission: RedditThing {
    fn author(&self) -> &str;
    fn author_id(&self) -> &ThingId;
    fn subreddit(&self) -> &str;
    fn subreddit_id(&self) -> &ThingId;
    /// The subreddit for a post, the parent thing for a comment.
    fn parent_id(&self) -> &ThingId;
    fn title(&self) -> &str;
    fn body(&self) -> &str;
    fn score(&self) -> i64;
    fn is_sticky(&self) -> bool;
    fn is_removed(&self) -> bool;
    fn is_approved(&self) -> bool;
    fn banned(&self) -> ModActionInfo;
    fn approved(&self) -> ModActionInfo;
    fn reports(&self) -> Reports;
}

/// Modqueue entries can be either kind of submission.
#[derive(Debug, Clone)]
pub enum PostOrComment {
    Post(Box<Post>),
    Comment(Box<Comment>),
}

impl PostOrComment {
    fn inner(&self) -> &dyn Submission {
        match self {
            PostOrComment::Post(post) => &**post,
            PostOrComment::Comment(comment) => &**comment,
        }
    }
}

impl FromThing for PostOrComment {
    fn from_thing(thing: Thing) -> Option<Self> {
        match thing {
            Thing::Post(post) => Some(PostOrComment::Post(post)),
            Thing::Comment(comment) => Some(PostOrComment::Comment(comment)),
            _ => None,
        }
    }
}

impl RedditThing for PostOrComment {
    fn id(&self) -> ThingId {
        self.inner().id()
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.inner().created_at()
    }

    fn url(&self) -> String {
        self.inner().url()
    }
}

impl Submission for PostOrComment {
    fn author(&self) -> &str {
        self.inner().author()
    }

    fn author_id(&self) -> &ThingId {
        self.inner().author_id()
    }

    fn subreddit(&self) -> &str {
        self.inner().subreddit()
    }

    fn subreddit_id(&self) -> &ThingId {
        self.inner().subreddit_id()
    }

    fn parent_id(&self) -> &ThingId {
        self.inner().parent_id()
    }

    fn title(&self) -> &str {
        self.inner().title()
    }

    fn body(&self) -> &str {
        self.inner().body()
    }

    fn score(&self) -> i64 {
        self.inner().score()
    }

    fn is_sticky(&self) -> bool {
        self.inner().is_sticky()
    }

    fn is_removed(&self) -> bool {
        self.inner().is_removed()
    }

    fn is_approved(&self) -> bool {
        self.inner().is_approved()
    }

    fn banned(&self) -> ModActionInfo {
        self.inner().banned()
    }

    fn approved(&self) -> ModActionInfo {
        self.inner().approved()
    }

    fn reports(&self) -> Reports {
        self.inner().reports()
    }
}
