use super::envelope::Thing;
use super::id::ThingId;
use log::debug;
use serde::de::Deserializer;
use serde::Deserialize;
use serde_json::Value;

/// One entry of `json.errors`, sent as `[code, message, field]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionError {
    pub code: String,
    pub message: String,
    pub field: Option<String>,
}

impl<'de> Deserialize<'de> for ActionError {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = |v: Option<&Value>| v.and_then(Value::as_str).map(str::to_string);
        let entry = match Value::deserialize(deserializer)? {
            Value::Array(items) => ActionError {
                code: text(items.first()).unwrap_or_default(),
                message: text(items.get(1)).unwrap_or_default(),
                field: text(items.get(2)),
            },
            Value::String(code) => ActionError {
                code,
                ..ActionError::default()
            },
            other => ActionError {
                message: other.to_string(),
                ..ActionError::default()
            },
        };
        Ok(entry)
    }
}

/// Result of a POST made with `api_type=json`.
#[derive(Debug, Clone, Default)]
pub struct ActionResponse {
    pub errors: Vec<ActionError>,
    /// Fullname of a created thing (submit).
    pub name: Option<ThingId>,
    pub url: Option<String>,
    /// Things returned by the action (reply, edit).
    pub things: Vec<Thing>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Wire {
    json: Body,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Body {
    errors: Vec<ActionError>,
    data: Option<Data>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Data {
    name: Option<ThingId>,
    url: Option<String>,
    things: Vec<Value>,
}

impl ActionResponse {
    /// Decode an action response. Endpoints that reply with `{}` yield an
    /// empty, successful response.
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        if value.is_null() {
            return Ok(ActionResponse::default());
        }
        let wire: Wire = serde_json::from_value(value)?;
        let data = wire.json.data.unwrap_or_default();
        let things = data
            .things
            .into_iter()
            .filter_map(|thing| match Thing::from_value(thing) {
                Ok(thing) => Some(thing),
                Err(e) => {
                    debug!("dropping action result: {}", e);
                    None
                }
            })
            .collect();
        Ok(ActionResponse {
            errors: wire.json.errors,
            name: data.name.filter(|id| !id.is_empty()),
            url: data.url,
            things,
        })
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}
