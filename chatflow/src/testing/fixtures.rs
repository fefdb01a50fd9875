//! Record fixtures.

use serde_json::{json, Value};

use crate::core::{Message, Record};

/// Builder for chat records used in tests and benchmarks.
#[derive(Debug, Default, Clone)]
pub struct ChatRecordBuilder {
    messages: Vec<Value>,
    extra: Vec<(String, Value)>,
}

impl ChatRecordBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message.
    #[must_use]
    pub fn message(mut self, role: &str, content: &str) -> Self {
        self.messages.push(Message::new(role, content).into());
        self
    }

    /// Appends a user message.
    #[must_use]
    pub fn user(self, content: &str) -> Self {
        self.message("user", content)
    }

    /// Appends an assistant message.
    #[must_use]
    pub fn assistant(self, content: &str) -> Self {
        self.message("assistant", content)
    }

    /// Appends a system message.
    #[must_use]
    pub fn system(self, content: &str) -> Self {
        self.message("system", content)
    }

    /// Appends a raw message entry.
    #[must_use]
    pub fn raw_message(mut self, entry: Value) -> Self {
        self.messages.push(entry);
        self
    }

    /// Sets an extra field.
    #[must_use]
    pub fn field(mut self, name: &str, value: Value) -> Self {
        self.extra.push((name.to_string(), value));
        self
    }

    /// Sets the `content` field.
    #[must_use]
    pub fn content(self, content: &str) -> Self {
        self.field("content", json!(content))
    }

    /// Builds the record with `messages` first.
    #[must_use]
    pub fn build(self) -> Record {
        self.extra
            .into_iter()
            .fold(Record::new().with_field("messages", Value::Array(self.messages)), |record, (name, value)| {
                record.with_field(name, value)
            })
    }
}

/// Builds a batch of `size` user/assistant conversations with `turns` turns each.
#[must_use]
pub fn conversation_batch(size: usize, turns: usize) -> Vec<Record> {
    (0..size)
        .map(|i| {
            (0..turns)
                .fold(ChatRecordBuilder::new().field("id", json!(i)), |builder, t| {
                    builder
                        .user(&format!("question {i}.{t}"))
                        .assistant(&format!("answer {i}.{t}"))
                })
                .build()
        })
        .collect()
}
