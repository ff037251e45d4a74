//! Two-stage decoding for fields Reddit does not type consistently.
//!
//! A field marked `#[serde(default, deserialize_with = "lenient::deserialize")]`
//! is first read as an untyped [`Value`], then coerced by shape into its
//! canonical type. A shape that does not fit yields the type's default
//! instead of failing the whole record.
//!
//! Known offenders:
//! * `edited` is `false` or a float timestamp
//! * `replies` is `""` or a Listing envelope
//! * `distinguished`, `banned_by` are strings, booleans or null
//! * timestamps arrive as ints, floats or null
//! * `media_embed` is an object, sometimes an empty array

use chrono::{DateTime, Utc};
use log::trace;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// A type that can be coerced out of an arbitrary JSON value.
pub trait Lenient: Sized + Default {
    /// `None` means the shape did not fit; the caller falls back to `Default`.
    fn coerce(value: Value) -> Option<Self>;
}

/// `deserialize_with` adapter for [`Lenient`] fields.
pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Lenient,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_or_default(value))
}

pub(crate) fn coerce_or_default<T: Lenient>(value: Value) -> T {
    let shown = if log::log_enabled!(log::Level::Trace) {
        Some(value.to_string())
    } else {
        None
    };
    T::coerce(value).unwrap_or_else(|| {
        if let Some(shown) = shown {
            trace!(
                "defaulting {} from unexpected value {}",
                std::any::type_name::<T>(),
                shown
            );
        }
        T::default()
    })
}

/// Convert a unix timestamp in (possibly fractional) seconds.
pub fn timestamp(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.trunc();
    let nanos = ((secs - whole) * 1e9).round().clamp(0.0, 999_999_999.0) as u32;
    DateTime::from_timestamp(whole as i64, nanos)
}

/// Whether and when a post or comment was edited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Edited {
    #[default]
    NotEdited,
    At(DateTime<Utc>),
}

impl Edited {
    pub fn is_edited(&self) -> bool {
        matches!(self, Edited::At(_))
    }

    pub fn edited_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Edited::At(at) => Some(*at),
            Edited::NotEdited => None,
        }
    }
}

impl Lenient for Edited {
    fn coerce(value: Value) -> Option<Self> {
        match value {
            Value::Bool(false) | Value::Null => Some(Edited::NotEdited),
            Value::Number(n) => n.as_f64().and_then(timestamp).map(Edited::At),
            _ => None,
        }
    }
}

impl Lenient for f64 {
    fn coerce(value: Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}

impl Lenient for i64 {
    fn coerce(value: Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}

impl Lenient for u64 {
    fn coerce(value: Value) -> Option<Self> {
        match value {
            Value::Number(n) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.trunc() as u64)),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}

impl Lenient for bool {
    fn coerce(value: Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(b),
            Value::Null => Some(false),
            _ => None,
        }
    }
}

impl Lenient for String {
    fn coerce(value: Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s),
            Value::Null => Some(String::new()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Nullable text. `true` is kept as the literal `"true"`: Reddit sends it for
/// `banned_by` when the acting moderator is hidden.
impl Lenient for Option<String> {
    fn coerce(value: Value) -> Option<Self> {
        match value {
            Value::String(s) if s.is_empty() => Some(None),
            Value::String(s) => Some(Some(s)),
            Value::Bool(true) => Some(Some("true".to_string())),
            Value::Bool(false) | Value::Null => Some(None),
            _ => None,
        }
    }
}

impl Lenient for Option<bool> {
    fn coerce(value: Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Some(b)),
            Value::Null => Some(None),
            _ => None,
        }
    }
}

impl Lenient for Option<DateTime<Utc>> {
    fn coerce(value: Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(n.as_f64().and_then(timestamp)),
            Value::String(s) => DateTime::parse_from_rfc3339(&s)
                .ok()
                .map(|at| Some(at.with_timezone(&Utc))),
            Value::Null | Value::Bool(false) => Some(None),
            _ => None,
        }
    }
}

/// Objects that are sometimes sent as an empty array.
impl Lenient for Option<Map<String, Value>> {
    fn coerce(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) if map.is_empty() => Some(None),
            Value::Object(map) => Some(Some(map)),
            Value::Array(_) | Value::Null => Some(None),
            _ => None,
        }
    }
}

/// Arrays whose entries are decoded one by one; entries that do not decode
/// are dropped.
impl<T: DeserializeOwned> Lenient for Vec<T> {
    fn coerce(value: Value) -> Option<Self> {
        match value {
            Value::Array(items) => Some(
                items
                    .into_iter()
                    .filter_map(|item| serde_json::from_value(item).ok())
                    .collect(),
            ),
            Value::Null => Some(Vec::new()),
            _ => None,
        }
    }
}
