//! Selective message rewriting through a generation capability.

use super::{not_a_list, not_a_message, Step};
use crate::core::{content_text, role_of, Batch, Record, StepCategory};
use crate::errors::{ChatflowError, Result};
use crate::generation::{build_prompt, Generator, Predicate};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

const CATEGORIES: &[StepCategory] = &[StepCategory::Chat, StepCategory::TextGeneration];

/// Rewrites the content of selected messages with generated text.
///
/// A message is selected when its `role` equals the target role and the
/// predicate accepts its content. The prompt wraps the original content in a
/// triple-backtick fence followed by a blank line and the instructions. Only
/// `content` of selected messages changes; message count and order never do.
///
/// Generation calls are made one at a time, in message order within a record
/// and in batch order across records.
pub struct RewriteMessages {
    name: String,
    instructions: String,
    target_role: String,
    predicate: Arc<dyn Predicate>,
    generator: Arc<dyn Generator>,
}

impl RewriteMessages {
    /// Creates a new rewrite step.
    #[must_use]
    pub fn new(
        instructions: impl Into<String>,
        target_role: impl Into<String>,
        predicate: Arc<dyn Predicate>,
        generator: Arc<dyn Generator>,
    ) -> Self {
        Self {
            name: "rewrite_messages".to_string(),
            instructions: instructions.into(),
            target_role: target_role.into(),
            predicate,
            generator,
        }
    }

    /// Sets the step name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Returns the instructions appended to every prompt.
    #[must_use]
    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// Returns the role whose messages are candidates.
    #[must_use]
    pub fn target_role(&self) -> &str {
        &self.target_role
    }

    /// Rewrites the batch in place and returns the number of rewritten messages.
    ///
    /// This is not transactional. When a generation call fails, every
    /// message rewritten before it (in this or earlier records) keeps its new
    /// content, and the error names the record and message that failed.
    pub fn rewrite_in_place(&self, records: &mut [Record]) -> Result<usize> {
        let mut rewritten = 0;
        for (index, record) in records.iter_mut().enumerate() {
            rewritten += self.rewrite_record(record, index)?;
        }
        Ok(rewritten)
    }

    fn rewrite_record(&self, record: &mut Record, index: usize) -> Result<usize> {
        let Some(messages) = record.get_mut("messages") else {
            return Ok(0);
        };
        let messages = messages
            .as_array_mut()
            .ok_or_else(|| not_a_list(&self.name, index))?;

        let mut rewritten = 0;
        for (position, entry) in messages.iter_mut().enumerate() {
            let Some(prompt) = self.prompt_for(entry, index, position)? else {
                continue;
            };

            let generation = self
                .generator
                .generate(&prompt)
                .map_err(|source| ChatflowError::Generation {
                    step: self.name.clone(),
                    record: index,
                    message: position,
                    source,
                })?;

            tracing::debug!(
                step = %self.name,
                record = index,
                message = position,
                prompt_chars = prompt.len(),
                "Rewrote message"
            );

            if let Value::Object(fields) = entry {
                fields.insert("content".to_string(), Value::String(generation));
            }
            rewritten += 1;
        }

        Ok(rewritten)
    }

    /// Returns the prompt for an entry if it is selected.
    fn prompt_for(&self, entry: &Value, index: usize, position: usize) -> Result<Option<String>> {
        if !entry.is_object() {
            return Err(not_a_message(&self.name, index, position));
        }
        if role_of(entry) != Some(self.target_role.as_str()) {
            return Ok(None);
        }

        let content = content_text(entry);
        if !self.predicate.should_process(&content) {
            return Ok(None);
        }

        Ok(Some(build_prompt(&content, &self.instructions)))
    }
}

impl fmt::Debug for RewriteMessages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RewriteMessages")
            .field("name", &self.name)
            .field("instructions", &self.instructions)
            .field("target_role", &self.target_role)
            .finish_non_exhaustive()
    }
}

impl Step for RewriteMessages {
    fn name(&self) -> &str {
        &self.name
    }

    fn inputs(&self) -> Vec<&str> {
        vec!["messages"]
    }

    fn outputs(&self) -> Vec<&str> {
        vec!["messages"]
    }

    fn categories(&self) -> &[StepCategory] {
        CATEGORIES
    }

    fn process(&self, mut batch: Batch) -> Result<Batch> {
        let rewritten = self.rewrite_in_place(&mut batch)?;
        tracing::info!(step = %self.name, records = batch.len(), rewritten, "Rewrote messages");
        Ok(batch)
    }
}
