//! Chat messages and permissive readers over raw message entries.
//!
//! Messages travel inside records as JSON objects so that keys other than
//! `role` and `content` survive every step untouched. The typed [`Message`]
//! is used when a step builds a new entry.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;

/// A role/content pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The speaker label. Any string is accepted.
    pub role: String,
    /// The message text.
    #[serde(default)]
    pub content: String,
}

impl Message {
    /// Creates a new message.
    #[must_use]
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Creates a system message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    /// Creates a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    /// Creates an assistant message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }
}

impl From<Message> for Value {
    fn from(message: Message) -> Self {
        serde_json::json!({
            "role": message.role,
            "content": message.content,
        })
    }
}

/// Renders a JSON value as text.
///
/// Strings render verbatim, `null` renders as empty and every other value
/// renders as its JSON text.
#[must_use]
pub fn value_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Null => Cow::Borrowed(""),
        other => Cow::Owned(other.to_string()),
    }
}

/// Returns the role of a message entry when it is a string.
#[must_use]
pub fn role_of(entry: &Value) -> Option<&str> {
    entry.get("role").and_then(Value::as_str)
}

/// Returns the content of a message entry, reading a missing one as empty.
#[must_use]
pub fn content_text(entry: &Value) -> Cow<'_, str> {
    entry.get("content").map_or(Cow::Borrowed(""), value_text)
}
