//! Reddit "fullname" identifiers and the entity kinds encoded in their prefix.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The type of entity a [`ThingId`] or envelope refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Comment,
    Redditor,
    Post,
    Message,
    Subreddit,
    Award,
    ModAction,
    Unknown,
}

impl EntityKind {
    /// Wire prefix for this kind, as used in fullnames and envelope `kind` fields.
    pub fn prefix(self) -> &'static str {
        match self {
            EntityKind::Comment => "t1",
            EntityKind::Redditor => "t2",
            EntityKind::Post => "t3",
            EntityKind::Message => "t4",
            EntityKind::Subreddit => "t5",
            EntityKind::Award => "t6",
            EntityKind::ModAction => "modaction",
            EntityKind::Unknown => "tX",
        }
    }

    /// Map a prefix (case-insensitive) to its kind. Anything unrecognised is `Unknown`.
    pub fn from_prefix(prefix: &str) -> Self {
        match prefix.to_ascii_lowercase().as_str() {
            "t1" => EntityKind::Comment,
            "t2" => EntityKind::Redditor,
            "t3" => EntityKind::Post,
            "t4" => EntityKind::Message,
            "t5" => EntityKind::Subreddit,
            "t6" => EntityKind::Award,
            "modaction" => EntityKind::ModAction,
            _ => EntityKind::Unknown,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// A Reddit fullname such as `t3_abcd12`.
///
/// The value is kept verbatim. Malformed ids are allowed and classify as
/// [`EntityKind::Unknown`]; the API hands those out often enough that
/// rejecting them would lose data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ThingId(String);

impl ThingId {
    /// Build a canonical fullname from a kind and a base36 id.
    pub fn new(kind: EntityKind, id36: &str) -> Self {
        Self(format!("{}_{}", kind.prefix(), id36))
    }

    /// Rebuild a redditor fullname from a numeric account id.
    ///
    /// New modmail reports author ids as plain integers; everywhere else they
    /// are `t2_<base36>`.
    pub fn from_author_number(id: u64) -> Self {
        Self::new(EntityKind::Redditor, &to_base36(id))
    }

    /// Classify this id by its prefix.
    pub fn kind(&self) -> EntityKind {
        match self.0.split_once('_') {
            Some((prefix, _)) => EntityKind::from_prefix(prefix),
            None => EntityKind::Unknown,
        }
    }

    /// The part after the first underscore, or the whole id if there is none.
    pub fn base36(&self) -> &str {
        self.0.split_once('_').map_or(self.0.as_str(), |(_, rest)| rest)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ThingId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ThingId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for ThingId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ThingId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl PartialEq<str> for ThingId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ThingId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl<'de> Deserialize<'de> for ThingId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::String(s) => Ok(ThingId(s)),
            serde_json::Value::Null => Ok(ThingId::default()),
            serde_json::Value::Number(n) => {
                if let Some(id) = n.as_u64() {
                    Ok(ThingId::from_author_number(id))
                } else if let Some(f) = n.as_f64().filter(|f| f.is_finite() && *f >= 0.0) {
                    Ok(ThingId::from_author_number(f.trunc() as u64))
                } else {
                    Err(de::Error::custom(format!("invalid numeric thing id {}", n)))
                }
            }
            other => Err(de::Error::custom(format!(
                "unknown type for thing id: {}",
                other
            ))),
        }
    }
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut buf = Vec::new();
    while n > 0 {
        buf.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    buf.reverse();
    String::from_utf8_lossy(&buf).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_prefixes() {
        let cases = [
            ("t1_abc", EntityKind::Comment),
            ("t2_abc", EntityKind::Redditor),
            ("t3_abcd12", EntityKind::Post),
            ("t4_abc", EntityKind::Message),
            ("t5_2qh1i", EntityKind::Subreddit),
            ("t6_abc", EntityKind::Award),
            ("ModAction_1f0e2c", EntityKind::ModAction),
            ("T3_upper", EntityKind::Post),
        ];
        for (id, kind) in cases {
            assert_eq!(ThingId::from(id).kind(), kind, "{}", id);
        }
    }

    #[test]
    fn unknown_and_malformed_ids_are_unknown() {
        for id in ["xx_1", "", "abcdef", "_abc", "t9_x"] {
            assert_eq!(ThingId::from(id).kind(), EntityKind::Unknown, "{:?}", id);
        }
    }

    #[test]
    fn kind_uses_first_underscore_only() {
        let id = ThingId::from("t1_abc_def");
        assert_eq!(id.kind(), EntityKind::Comment);
        assert_eq!(id.base36(), "abc_def");
    }

    #[test]
    fn numeric_author_ids_become_redditor_fullnames() {
        assert_eq!(ThingId::from_author_number(0), "t2_0");
        assert_eq!(ThingId::from_author_number(35), "t2_z");
        assert_eq!(ThingId::from_author_number(36), "t2_10");
        assert_eq!(ThingId::from_author_number(1_234_567), "t2_qglj");
    }

    #[test]
    fn deserializes_strings_numbers_and_null() {
        let id: ThingId = serde_json::from_str("\"t3_abc\"").unwrap();
        assert_eq!(id, "t3_abc");

        let id: ThingId = serde_json::from_str("1234567").unwrap();
        assert_eq!(id, "t2_qglj");
        assert_eq!(id.kind(), EntityKind::Redditor);

        let id: ThingId = serde_json::from_str("1234567.0").unwrap();
        assert_eq!(id, "t2_qglj");

        let id: ThingId = serde_json::from_str("null").unwrap();
        assert!(id.is_empty());

        assert!(serde_json::from_str::<ThingId>("[1]").is_err());
    }

    #[test]
    fn new_builds_canonical_fullname() {
        let id = ThingId::new(EntityKind::Post, "abcd12");
        assert_eq!(id.as_str(), "t3_abcd12");
        assert_eq!(id.base36(), "abcd12");
        assert_eq!(id.to_string(), "t3_abcd12");
    }
}
