//! Plaintext transcript formatting.

use super::{not_a_list, not_a_message, Step};
use crate::core::{content_text, value_text, Batch, Record, StepCategory};
use crate::errors::Result;
use serde_json::Value;

const CATEGORIES: &[StepCategory] = &[StepCategory::Format, StepCategory::Chat, StepCategory::Transcript];

/// Renders each record's messages into a `transcript` field.
///
/// Every message becomes one `"<role>: <content>"` line; lines are joined
/// with `\n` and there is no trailing newline.
#[derive(Debug, Clone)]
pub struct FormatTranscript {
    name: String,
}

impl FormatTranscript {
    /// Creates a new transcript formatter.
    #[must_use]
    pub fn new() -> Self {
        Self::named("format_transcript")
    }

    /// Creates a transcript formatter with a custom name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Renders a record's messages.
    ///
    /// # Errors
    ///
    /// Fails if `messages` is absent, is not a list, or holds a non-object.
    pub fn render(&self, record: &Record, index: usize) -> Result<String> {
        let messages = record
            .require("messages", &self.name, index)?
            .as_array()
            .ok_or_else(|| not_a_list(&self.name, index))?;

        let mut lines = Vec::with_capacity(messages.len());
        for (position, entry) in messages.iter().enumerate() {
            if !entry.is_object() {
                return Err(not_a_message(&self.name, index, position));
            }
            let role = entry.get("role").map_or_else(Default::default, value_text);
            lines.push(format!("{}: {}", role, content_text(entry)));
        }

        Ok(lines.join("\n"))
    }
}

impl Default for FormatTranscript {
    fn default() -> Self {
        Self::new()
    }
}

impl Step for FormatTranscript {
    fn name(&self) -> &str {
        &self.name
    }

    fn inputs(&self) -> Vec<&str> {
        vec!["messages"]
    }

    fn outputs(&self) -> Vec<&str> {
        vec!["transcript"]
    }

    fn categories(&self) -> &[StepCategory] {
        CATEGORIES
    }

    fn process(&self, mut batch: Batch) -> Result<Batch> {
        let transcripts = batch
            .iter()
            .enumerate()
            .map(|(index, record)| self.render(record, index))
            .collect::<Result<Vec<_>>>()?;

        for (record, transcript) in batch.iter_mut().zip(transcripts) {
            record.insert("transcript", Value::String(transcript));
        }

        tracing::debug!(step = %self.name, records = batch.len(), "Formatted transcripts");
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(value: Value) -> Record {
        Record::from_value(value).unwrap()
    }

    #[test]
    fn test_formats_messages_in_order() {
        let batch = vec![record(json!({
            "messages": [
                {"role": "user", "content": "What's 2+2?"},
                {"role": "assistant", "content": "4"}
            ]
        }))];

        let out = FormatTranscript::new().process(batch).unwrap();

        assert_eq!(out[0].get("transcript"), Some(&json!("user: What's 2+2?\nassistant: 4")));
    }

    #[test]
    fn test_one_line_per_message() {
        let messages: Vec<Value> = (0..5)
            .map(|i| json!({"role": format!("r{i}"), "content": format!("c{i}")}))
            .collect();
        let batch = vec![record(json!({ "messages": messages }))];

        let out = FormatTranscript::new().process(batch).unwrap();
        let transcript = out[0].get("transcript").and_then(Value::as_str).unwrap();
        let lines: Vec<&str> = transcript.split('\n').collect();

        assert_eq!(lines.len(), 5);
        for (i, line) in lines.iter().enumerate() {
            assert_eq!(*line, format!("r{i}: c{i}"));
        }
        assert!(!transcript.ends_with('\n'));
    }

    #[test]
    fn test_empty_messages_give_empty_transcript() {
        let out = FormatTranscript::new()
            .process(vec![record(json!({"messages": []}))])
            .unwrap();
        assert_eq!(out[0].get("transcript"), Some(&json!("")));
    }

    #[test]
    fn test_missing_content_reads_as_empty() {
        let out = FormatTranscript::new()
            .process(vec![record(json!({"messages": [{"role": "user"}]}))])
            .unwrap();
        assert_eq!(out[0].get("transcript"), Some(&json!("user: ")));
    }

    #[test]
    fn test_other_fields_untouched() {
        let input = record(json!({
            "id": 7,
            "messages": [{"role": "system", "content": "s"}],
        }));
        let out = FormatTranscript::new().process(vec![input.clone()]).unwrap();

        assert_eq!(out[0].get("id"), input.get("id"));
        assert_eq!(out[0].messages(), input.messages());
        assert_eq!(out[0].field_names(), vec!["id", "messages", "transcript"]);
    }

    #[test]
    fn test_missing_messages_fails() {
        let err = FormatTranscript::new()
            .process(vec![record(json!({"messages": []})), record(json!({"other": 1}))])
            .unwrap_err();

        assert_eq!(err.kind(), "missing_field");
        assert!(err.to_string().contains("record 1"));
    }

    #[test]
    fn test_non_list_messages_fails() {
        let err = FormatTranscript::new()
            .process(vec![record(json!({"messages": "hello"}))])
            .unwrap_err();
        assert_eq!(err.kind(), "invalid_field");
    }

    #[test]
    fn test_non_object_entry_fails() {
        let err = FormatTranscript::new()
            .process(vec![record(json!({"messages": ["hello"]}))])
            .unwrap_err();
        assert!(err.to_string().contains("entry 0"));
    }
}
