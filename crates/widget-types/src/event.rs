use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Payload carried by a bus event.
///
/// Events that only announce something to the user carry a `Message`.
/// Generic events fall back to an open key-value map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum EventDetail {
    #[default]
    Empty,
    Message { message: String },
    Fields(Map<String, Value>),
}

impl EventDetail {
    pub fn message(text: impl Into<String>) -> Self {
        EventDetail::Message {
            message: text.into(),
        }
    }

    /// Classify an untyped JSON payload. `{}` and `null` are `Empty`, an
    /// object whose only key is a string `message` is `Message`, any other
    /// object is `Fields`. Non-object values are wrapped under `value`.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => EventDetail::Empty,
            Value::Object(map) if map.is_empty() => EventDetail::Empty,
            Value::Object(map) => match (map.len(), map.get("message")) {
                (1, Some(Value::String(text))) => EventDetail::message(text.clone()),
                _ => EventDetail::Fields(map),
            },
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                EventDetail::Fields(map)
            }
        }
    }

    /// The message text, whether the payload is typed or an open map.
    pub fn message_text(&self) -> Option<&str> {
        match self {
            EventDetail::Message { message } => Some(message),
            EventDetail::Fields(map) => map.get("message").and_then(Value::as_str),
            EventDetail::Empty => None,
        }
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        match self {
            EventDetail::Fields(map) => map.get(key),
            _ => None,
        }
    }

    /// Flatten back to the untyped shape page scripts expect.
    pub fn to_json(&self) -> Value {
        match self {
            EventDetail::Empty => Value::Object(Map::new()),
            EventDetail::Message { message } => {
                let mut map = Map::new();
                map.insert("message".to_string(), Value::String(message.clone()));
                Value::Object(map)
            }
            EventDetail::Fields(map) => Value::Object(map.clone()),
        }
    }
}

/// An event as delivered to listeners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusEvent {
    pub event_type: String,
    pub detail: EventDetail,
    pub timestamp: DateTime<Utc>,
}

impl BusEvent {
    pub fn new(event_type: impl Into<String>, detail: EventDetail) -> Self {
        Self {
            event_type: event_type.into(),
            detail,
            timestamp: Utc::now(),
        }
    }
}
