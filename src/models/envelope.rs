//! Decoding of Reddit's `{"kind": ..., "data": ...}` envelopes.

use super::comment::Comment;
use super::id::{EntityKind, ThingId};
use super::lenient;
use super::message::Message;
use super::modaction::ModAction;
use super::post::Post;
use super::redditor::Redditor;
use super::subreddit::Subreddit;
use super::wiki::{Stylesheet, Wiki};
use super::RedditThing;
use chrono::{DateTime, Utc};
use log::debug;
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unknown kind {0:?}")]
    UnknownKind(String),
    #[error("data does not match kind {kind:?}: {source}")]
    ShapeMismatch {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("malformed envelope: {0}")]
    Json(#[from] serde_json::Error),
}

/// The raw wire envelope.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Envelope {
    pub kind: String,
    #[serde(default)]
    pub data: Value,
}

fn shape<T: DeserializeOwned>(kind: &str, data: Value) -> Result<T, DecodeError> {
    serde_json::from_value(data).map_err(|source| DecodeError::ShapeMismatch {
        kind: kind.to_string(),
        source,
    })
}

/// A decoded entity.
#[derive(Debug, Clone)]
pub enum Thing {
    Comment(Box<Comment>),
    Redditor(Box<Redditor>),
    Post(Box<Post>),
    Message(Box<Message>),
    Subreddit(Box<Subreddit>),
    ModAction(Box<ModAction>),
}

impl Thing {
    pub fn decode(envelope: Envelope) -> Result<Self, DecodeError> {
        let Envelope { kind, data } = envelope;
        match EntityKind::from_prefix(&kind) {
            EntityKind::Comment => shape(&kind, data).map(|c| Thing::Comment(Box::new(c))),
            EntityKind::Redditor => shape(&kind, data).map(|r| Thing::Redditor(Box::new(r))),
            EntityKind::Post => shape(&kind, data).map(|p| Thing::Post(Box::new(p))),
            EntityKind::Message => shape(&kind, data).map(|m| Thing::Message(Box::new(m))),
            EntityKind::Subreddit => shape(&kind, data).map(|s| Thing::Subreddit(Box::new(s))),
            EntityKind::ModAction => shape(&kind, data).map(|m| Thing::ModAction(Box::new(m))),
            EntityKind::Award | EntityKind::Unknown => Err(DecodeError::UnknownKind(kind)),
        }
    }

    pub fn from_value(value: Value) -> Result<Self, DecodeError> {
        Self::decode(serde_json::from_value(value)?)
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Thing::Comment(_) => EntityKind::Comment,
            Thing::Redditor(_) => EntityKind::Redditor,
            Thing::Post(_) => EntityKind::Post,
            Thing::Message(_) => EntityKind::Message,
            Thing::Subreddit(_) => EntityKind::Subreddit,
            Thing::ModAction(_) => EntityKind::ModAction,
        }
    }
}

impl Thing {
    fn inner(&self) -> &dyn RedditThing {
        match self {
            Thing::Comment(c) => &**c,
            Thing::Redditor(r) => &**r,
            Thing::Post(p) => &**p,
            Thing::Message(m) => &**m,
            Thing::Subreddit(s) => &**s,
            Thing::ModAction(m) => &**m,
        }
    }
}

impl RedditThing for Thing {
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

impl<'de> Deserialize<'de> for Thing {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let envelope = Envelope::deserialize(deserializer)?;
        Thing::decode(envelope).map_err(de::Error::custom)
    }
}

/// Conversion from a decoded [`Thing`] into one concrete record type.
///
/// Returns `None` when the variant does not match, which is how listings
/// filter out children of the wrong kind.
pub trait FromThing: Sized {
    fn from_thing(thing: Thing) -> Option<Self>;
}

impl FromThing for Thing {
    fn from_thing(thing: Thing) -> Option<Self> {
        Some(thing)
    }
}

macro_rules! from_thing {
    ($($variant:ident),*) => {
        $(
            impl FromThing for $variant {
                fn from_thing(thing: Thing) -> Option<Self> {
                    match thing {
                        Thing::$variant(inner) => Some(*inner),
                        _ => None,
                    }
                }
            }
        )*
    };
}

from_thing!(Comment, Redditor, Post, Message, Subreddit, ModAction);

/// One page of a Listing.
#[derive(Debug, Clone, Default)]
pub struct Listing {
    pub after: Option<ThingId>,
    pub before: Option<ThingId>,
    pub dist: Option<u64>,
    pub children: Vec<Thing>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawListing {
    after: Option<ThingId>,
    before: Option<ThingId>,
    #[serde(deserialize_with = "lenient::deserialize")]
    dist: u64,
    children: Vec<Value>,
}

impl Listing {
    fn decode(data: Value) -> Result<Self, DecodeError> {
        let raw: RawListing = shape("Listing", data)?;
        let children = raw
            .children
            .into_iter()
            .filter_map(|child| match Thing::from_value(child) {
                Ok(thing) => Some(thing),
                Err(e) => {
                    debug!("dropping listing child: {}", e);
                    None
                }
            })
            .collect();
        Ok(Listing {
            after: raw.after.filter(|id| !id.is_empty()),
            before: raw.before.filter(|id| !id.is_empty()),
            dist: Some(raw.dist).filter(|d| *d > 0),
            children,
        })
    }

    /// Keep the children of type `T` and drop the rest.
    pub fn into_page<T: FromThing>(self) -> ListingPage<T> {
        ListingPage {
            items: self.children.into_iter().filter_map(T::from_thing).collect(),
            after: self.after,
            before: self.before,
        }
    }
}

/// Typed items from one listing request, with its pagination cursors.
#[derive(Debug, Clone)]
pub struct ListingPage<T> {
    pub items: Vec<T>,
    pub after: Option<ThingId>,
    pub before: Option<ThingId>,
}

impl<T> Default for ListingPage<T> {
    fn default() -> Self {
        ListingPage {
            items: Vec::new(),
            after: None,
            before: None,
        }
    }
}

/// A top-level response envelope.
#[derive(Debug, Clone)]
pub enum Response {
    Listing(Listing),
    Wiki(Box<Wiki>),
    Stylesheet(Box<Stylesheet>),
}

impl Response {
    pub fn decode(envelope: Envelope) -> Result<Self, DecodeError> {
        let Envelope { kind, data } = envelope;
        match kind.as_str() {
            "Listing" => Listing::decode(data).map(Response::Listing),
            "wikipage" => shape(&kind, data).map(|w| Response::Wiki(Box::new(w))),
            "stylesheet" => shape(&kind, data).map(|s| Response::Stylesheet(Box::new(s))),
            _ => Err(DecodeError::UnknownKind(kind)),
        }
    }

    pub fn from_value(value: Value) -> Result<Self, DecodeError> {
        Self::decode(serde_json::from_value(value)?)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Response::Listing(_) => "Listing",
            Response::Wiki(_) => "wikipage",
            Response::Stylesheet(_) => "stylesheet",
        }
    }
}
