//! Chat turn and session identifier types for lifeassist.
//!
//! A conversation is an ordered list of [`ChatTurn`]s scoped by a
//! [`SessionId`]. Turns are what the HTTP API exchanges and what the
//! history store persists, so their JSON shape is part of the wire format:
//!
//! ```json
//! { "role": "user", "content": "hi" }
//! ```
//!
//! Clients are not trusted to send well-formed turns. A turn whose role is
//! missing or unrecognized keeps `role: None`, and non-string content is
//! rendered as JSON text, so one odd element never invalidates the list.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use std::fmt;
use std::str::FromStr;

/// Author of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    /// Text produced by the language model. `assistant` is accepted on input.
    #[serde(alias = "assistant")]
    Model,
}

impl fmt::Display for TurnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnRole::User => write!(f, "user"),
            TurnRole::Model => write!(f, "model"),
        }
    }
}

impl FromStr for TurnRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(TurnRole::User),
            "model" | "assistant" => Ok(TurnRole::Model),
            other => Err(format!("invalid turn role: '{other}'")),
        }
    }
}

/// One message in a conversation.
///
/// `role` is `None` when the sender gave no usable role. Such turns are
/// stored and returned, but never sent to the model as history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    #[serde(
        default,
        deserialize_with = "lenient_role",
        skip_serializing_if = "Option::is_none"
    )]
    pub role: Option<TurnRole>,
    #[serde(default, deserialize_with = "lenient_content")]
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Some(TurnRole::User),
            content: content.into(),
        }
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: Some(TurnRole::Model),
            content: content.into(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == Some(TurnRole::User)
    }
}

fn lenient_role<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<TurnRole>, D::Error> {
    let raw = Value::deserialize(deserializer)?;
    Ok(raw.as_str().and_then(|s| s.trim().parse().ok()))
}

fn lenient_content<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Parse a client-supplied `messages` value one element at a time.
///
/// Anything other than an array yields no turns. Elements that are not
/// JSON objects are skipped; objects always produce a turn.
pub fn turns_from_value(value: Value) -> Vec<ChatTurn> {
    let Value::Array(items) = value else {
        return Vec::new();
    };
    items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect()
}

/// Serde adapter for a lenient `messages` field.
pub fn deserialize_turns<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<ChatTurn>, D::Error> {
    Ok(turns_from_value(Value::deserialize(deserializer)?))
}

/// Sanitized identifier of a persisted conversation.
///
/// Always non-empty and always safe to use as a single file name component:
/// surrounding whitespace is trimmed, characters outside `[A-Za-z0-9_.-]`
/// become `_`, and a leading `.` becomes `_`. Blank input maps to
/// [`SessionId::DEFAULT`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub const DEFAULT: &'static str = "default";

    /// Build a session id from optional, untrusted input.
    pub fn new(raw: Option<&str>) -> Self {
        let trimmed = raw.map(str::trim).unwrap_or_default();
        if trimmed.is_empty() {
            return Self::default();
        }

        let mut sanitized: String = trimmed
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();

        if sanitized.starts_with('.') {
            sanitized.replace_range(..1, "_");
        }

        Self(sanitized)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(raw: &str) -> Self {
        Self::new(Some(raw))
    }
}

impl From<Option<String>> for SessionId {
    fn from(raw: Option<String>) -> Self {
        Self::new(raw.as_deref())
    }
}

impl<'de> Deserialize<'de> for SessionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => Self::new(Some(&s)),
            Value::Number(n) => Self::new(Some(&n.to_string())),
            _ => Self::default(),
        })
    }
}
