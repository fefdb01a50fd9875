//! Message insertion.

use super::{not_a_list, Step};
use crate::core::{Batch, StepCategory};
use crate::errors::Result;
use serde_json::{json, Value};

const CATEGORIES: &[StepCategory] = &[StepCategory::Format, StepCategory::Chat, StepCategory::Message];

/// Inserts a message built from the record's `content` field into its
/// `messages` list.
///
/// The index follows list-insert semantics: negative values count from the
/// end, indices past either end clamp to it. The new list replaces the
/// record's `messages` field; `content` is left in place.
#[derive(Debug, Clone)]
pub struct InsertMessage {
    name: String,
    index: i64,
    role: String,
}

impl InsertMessage {
    /// Creates a new inserter.
    #[must_use]
    pub fn new(index: i64, role: impl Into<String>) -> Self {
        Self {
            name: "insert_message".to_string(),
            index,
            role: role.into(),
        }
    }

    /// Sets the step name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Returns the configured index.
    #[must_use]
    pub fn index(&self) -> i64 {
        self.index
    }

    /// Returns the role of inserted messages.
    #[must_use]
    pub fn role(&self) -> &str {
        &self.role
    }
}

/// Resolves a possibly negative insert index against a list length.
#[must_use]
pub fn insert_position(index: i64, len: usize) -> usize {
    let len_i = i64::try_from(len).unwrap_or(i64::MAX);
    let position = if index < 0 { (index + len_i).max(0) } else { index.min(len_i) };
    usize::try_from(position).unwrap_or(len)
}

impl Step for InsertMessage {
    fn name(&self) -> &str {
        &self.name
    }

    fn inputs(&self) -> Vec<&str> {
        vec!["messages", "content"]
    }

    fn outputs(&self) -> Vec<&str> {
        vec!["messages"]
    }

    fn categories(&self) -> &[StepCategory] {
        CATEGORIES
    }

    fn process(&self, mut batch: Batch) -> Result<Batch> {
        // Build every new list before touching any record.
        let mut updated = Vec::with_capacity(batch.len());
        for (index, record) in batch.iter().enumerate() {
            let messages = record
                .require("messages", &self.name, index)?
                .as_array()
                .ok_or_else(|| not_a_list(&self.name, index))?;
            let content = record.require("content", &self.name, index)?;

            let mut messages = messages.clone();
            let position = insert_position(self.index, messages.len());
            messages.insert(position, json!({"role": self.role, "content": content}));
            updated.push(messages);
        }

        for (record, messages) in batch.iter_mut().zip(updated) {
            record.insert("messages", Value::Array(messages));
        }

        tracing::debug!(step = %self.name, records = batch.len(), role = %self.role, "Inserted messages");
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Record;
    use pretty_assertions::assert_eq;

    fn chat(contents: &[&str], content: &str) -> Record {
        let messages: Vec<Value> = contents
            .iter()
            .map(|c| json!({"role": "user", "content": c}))
            .collect();
        Record::from_value(json!({"messages": messages, "content": content})).unwrap()
    }

    fn contents(record: &Record) -> Vec<String> {
        record
            .messages()
            .and_then(Value::as_array)
            .unwrap()
            .iter()
            .map(|m| m["content"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_insert_system_prompt_first() {
        let input = Record::from_value(json!({
            "messages": [{"role": "user", "content": "Hi"}],
            "content": "Be nice"
        }))
        .unwrap();

        let out = InsertMessage::new(0, "system").process(vec![input]).unwrap();

        assert_eq!(
            out[0].messages(),
            Some(&json!([
                {"role": "system", "content": "Be nice"},
                {"role": "user", "content": "Hi"}
            ]))
        );
        assert_eq!(out[0].get("content"), Some(&json!("Be nice")));
    }

    #[test]
    fn test_non_negative_positions() {
        for index in 0..=3 {
            let out = InsertMessage::new(index, "system")
                .process(vec![chat(&["a", "b", "c"], "new")])
                .unwrap();
            let got = contents(&out[0]);

            assert_eq!(got.len(), 4);
            assert_eq!(got[usize::try_from(index).unwrap()], "new");
        }
    }

    #[test]
    fn test_negative_positions() {
        let cases = [
            (-1, vec!["a", "b", "new", "c"]),
            (-2, vec!["a", "new", "b", "c"]),
            (-3, vec!["new", "a", "b", "c"]),
            (-4, vec!["new", "a", "b", "c"]),
        ];

        for (index, expected) in cases {
            let out = InsertMessage::new(index, "system")
                .process(vec![chat(&["a", "b", "c"], "new")])
                .unwrap();
            assert_eq!(contents(&out[0]), expected, "index {index}");
        }
    }

    #[test]
    fn test_out_of_range_clamps() {
        let out = InsertMessage::new(99, "assistant")
            .process(vec![chat(&["a"], "tail")])
            .unwrap();
        assert_eq!(contents(&out[0]), vec!["a", "tail"]);

        let out = InsertMessage::new(-99, "assistant")
            .process(vec![chat(&["a"], "head")])
            .unwrap();
        assert_eq!(contents(&out[0]), vec!["head", "a"]);
    }

    #[test]
    fn test_insert_position_law() {
        assert_eq!(insert_position(0, 0), 0);
        assert_eq!(insert_position(-1, 0), 0);
        assert_eq!(insert_position(5, 2), 2);
        assert_eq!(insert_position(-1, 2), 1);
        assert_eq!(insert_position(i64::MIN, 2), 0);
    }

    #[test]
    fn test_source_list_not_mutated() {
        let input = chat(&["a", "b"], "x");
        let original = input.messages().cloned();

        let out = InsertMessage::new(1, "system").process(vec![input.clone()]).unwrap();

        assert_eq!(input.messages().cloned(), original);
        assert_eq!(contents(&out[0]).len(), 3);
    }

    #[test]
    fn test_missing_content_fails_without_partial_output() {
        let good = chat(&["a"], "x");
        let bad = Record::from_value(json!({"messages": []})).unwrap();

        let err = InsertMessage::new(0, "system").process(vec![good, bad]).unwrap_err();

        assert_eq!(err.kind(), "missing_field");
        assert!(err.to_string().contains("'content'"));
    }

    #[test]
    fn test_missing_messages_fails() {
        let bad = Record::from_value(json!({"content": "x"})).unwrap();
        let err = InsertMessage::new(0, "system").process(vec![bad]).unwrap_err();
        assert!(err.to_string().contains("'messages'"));
    }
}
