//! JSON Lines export of record messages.

use super::Step;
use crate::core::{Batch, Record, StepCategory};
use crate::errors::Result;
use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::Value;
use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Default output path.
pub const DEFAULT_JSONL_PATH: &str = "output.jsonl";

const CATEGORIES: &[StepCategory] = &[StepCategory::Save, StepCategory::File];

/// Writes each record's `messages` to one line of a JSONL file.
///
/// Every invocation truncates the file. Each line is `{"messages": [...]}`; a
/// `messages` value that is not a list is wrapped in a one-element list and
/// records without `messages` are skipped. The batch is returned unchanged.
#[derive(Debug, Clone)]
pub struct SaveToJsonl {
    name: String,
    file_path: PathBuf,
}

#[derive(Serialize)]
struct Line<'a> {
    messages: Cow<'a, Value>,
}

/// Compact JSON with a space after `,` and `:`.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b": ")
    }
}

impl SaveToJsonl {
    /// Creates a writer targeting the given path.
    #[must_use]
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            name: "save_to_jsonl".to_string(),
            file_path: file_path.into(),
        }
    }

    /// Sets the step name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Returns the target path.
    #[must_use]
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Writes one line per record holding `messages` and returns the line count.
    ///
    /// # Errors
    ///
    /// Returns an error if writing or serialization fails.
    pub fn write_records<W: Write>(records: &[Record], mut writer: W) -> Result<usize> {
        let mut lines = 0;
        for record in records {
            let messages = match record.messages() {
                None | Some(Value::Null) => continue,
                Some(list @ Value::Array(_)) => Cow::Borrowed(list),
                Some(single) => Cow::Owned(Value::Array(vec![single.clone()])),
            };

            let mut serializer = serde_json::Serializer::with_formatter(&mut writer, SpacedFormatter);
            Line { messages }.serialize(&mut serializer)?;
            writer.write_all(b"\n")?;
            lines += 1;
        }
        writer.flush()?;
        Ok(lines)
    }
}

impl Default for SaveToJsonl {
    fn default() -> Self {
        Self::new(DEFAULT_JSONL_PATH)
    }
}

impl Step for SaveToJsonl {
    fn name(&self) -> &str {
        &self.name
    }

    fn inputs(&self) -> Vec<&str> {
        vec!["messages"]
    }

    fn categories(&self) -> &[StepCategory] {
        CATEGORIES
    }

    fn is_global(&self) -> bool {
        true
    }

    fn process(&self, batch: Batch) -> Result<Batch> {
        let file = File::create(&self.file_path)?;
        let lines = Self::write_records(&batch, BufWriter::new(file))?;

        tracing::info!(
            step = %self.name,
            path = %self.file_path.display(),
            lines,
            "Saved messages"
        );
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::fs;

    fn record(value: Value) -> Record {
        Record::from_value(value).unwrap()
    }

    #[test]
    fn test_writes_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jsonl");
        let batch = vec![
            record(json!({"messages": [{"role": "user", "content": "hi"}], "extra": 1})),
            record(json!({"messages": [{"role": "user", "content": "a"}, {"role": "assistant", "content": "b"}]})),
        ];

        let out = SaveToJsonl::new(&path).process(batch.clone()).unwrap();
        assert_eq!(out, batch);

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "{\"messages\": [{\"role\": \"user\", \"content\": \"hi\"}]}\n\
             {\"messages\": [{\"role\": \"user\", \"content\": \"a\"}, {\"role\": \"assistant\", \"content\": \"b\"}]}\n"
        );
    }

    #[test]
    fn test_each_line_has_only_messages_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jsonl");
        let batch = vec![
            record(json!({"id": 1, "messages": [{"role": "user", "content": "x"}]})),
            record(json!({"id": 2, "messages": []})),
        ];

        SaveToJsonl::new(&path).process(batch).unwrap();

        for line in fs::read_to_string(&path).unwrap().lines() {
            let parsed: Value = serde_json::from_str(line).unwrap();
            let object = parsed.as_object().unwrap();
            assert_eq!(object.len(), 1);
            assert!(object["messages"].is_array());
        }
    }

    #[test]
    fn test_second_call_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jsonl");
        let step = SaveToJsonl::new(&path);

        step.process(vec![
            record(json!({"messages": [{"role": "user", "content": "one"}]})),
            record(json!({"messages": [{"role": "user", "content": "two"}]})),
        ])
        .unwrap();
        step.process(vec![record(json!({"messages": [{"role": "user", "content": "three"}]}))])
            .unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.contains("three"));
        assert!(!text.contains("one"));
    }

    #[test]
    fn test_scalar_messages_are_wrapped() {
        let mut buffer = Vec::new();
        let lines = SaveToJsonl::write_records(
            &[record(json!({"messages": {"role": "user", "content": "solo"}}))],
            &mut buffer,
        )
        .unwrap();

        assert_eq!(lines, 1);
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "{\"messages\": [{\"role\": \"user\", \"content\": \"solo\"}]}\n"
        );
    }

    #[test]
    fn test_records_without_messages_are_skipped() {
        let mut buffer = Vec::new();
        let lines = SaveToJsonl::write_records(
            &[
                record(json!({"content": "no messages"})),
                record(json!({"messages": null})),
                record(json!({"messages": []})),
            ],
            &mut buffer,
        )
        .unwrap();

        assert_eq!(lines, 1);
        assert_eq!(String::from_utf8(buffer).unwrap(), "{\"messages\": []}\n");
    }

    #[test]
    fn test_non_ascii_written_literally() {
        let mut buffer = Vec::new();
        SaveToJsonl::write_records(
            &[record(json!({"messages": [{"role": "user", "content": "héllo 世界 🚀"}]}))],
            &mut buffer,
        )
        .unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("héllo 世界 🚀"));
        assert!(!text.contains("\\u"));
    }

    #[test]
    fn test_unwritable_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.jsonl");

        let err = SaveToJsonl::new(path).process(Vec::new()).unwrap_err();
        assert_eq!(err.kind(), "io");
    }

    #[test]
    fn test_default_path() {
        assert_eq!(SaveToJsonl::default().file_path(), Path::new(DEFAULT_JSONL_PATH));
    }
}
