use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// A user report, sent on the wire as `[reason, count, ...]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserReport {
    pub reason: String,
    pub count: u64,
}

/// A moderator report, sent on the wire as `[reason, moderator]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModReport {
    pub reason: String,
    pub moderator: String,
}

/// Reports attached to a submission. Only populated for moderators.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reports {
    pub num_reports: u64,
    pub user: Vec<UserReport>,
    pub moderator: Vec<ModReport>,
}

/// Who performed a removal or approval, and when.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModActionInfo {
    pub by: Option<String>,
    pub at: Option<DateTime<Utc>>,
}

impl ModActionInfo {
    pub fn happened(&self) -> bool {
        self.by.is_some() || self.at.is_some()
    }
}

fn tuple<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Value>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Array(items) if items.len() >= 2 => Ok(items),
        other => Err(de::Error::custom(format!("expected report tuple, got {}", other))),
    }
}

impl<'de> Deserialize<'de> for UserReport {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = tuple(deserializer)?;
        Ok(UserReport {
            reason: items[0].as_str().unwrap_or_default().to_string(),
            count: items[1]
                .as_u64()
                .or_else(|| items[1].as_f64().map(|f| f.max(0.0) as u64))
                .ok_or_else(|| de::Error::custom("report count is not a number"))?,
        })
    }
}

impl<'de> Deserialize<'de> for ModReport {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = tuple(deserializer)?;
        Ok(ModReport {
            reason: items[0].as_str().unwrap_or_default().to_string(),
            moderator: items[1]
                .as_str()
                .ok_or_else(|| de::Error::custom("report moderator is not a string"))?
                .to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::lenient::Lenient;
    use serde_json::json;

    #[test]
    fn decodes_report_tuples() {
        let user: UserReport = serde_json::from_value(json!(["spam", 3, false, false])).unwrap();
        assert_eq!(user, UserReport { reason: "spam".into(), count: 3 });

        let m: ModReport = serde_json::from_value(json!(["rule 2", "some_mod"])).unwrap();
        assert_eq!(m.moderator, "some_mod");
    }

    #[test]
    fn malformed_entries_are_dropped_from_lists() {
        let raw = json!([["spam", 1], ["bad"], "nope", ["abuse", 2.0]]);
        let reports = Vec::<UserReport>::coerce(raw).unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[1].count, 2);
    }
}
