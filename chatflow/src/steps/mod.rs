//! Step trait and implementations.
//!
//! Steps are the units of work in chatflow. Each one consumes a batch of
//! records, performs a single transformation and returns the batch for the
//! next step.

mod drop_empty;
mod insert;
mod jsonl;
mod rewrite;
mod transcript;

pub use drop_empty::DropEmpty;
pub use insert::{insert_position, InsertMessage};
pub use jsonl::{SaveToJsonl, DEFAULT_JSONL_PATH};
pub use rewrite::RewriteMessages;
pub use transcript::FormatTranscript;

use crate::core::{Batch, StepCategory};
use crate::errors::{ChatflowError, Result};
use std::fmt::Debug;

/// Trait for record-transformation steps.
///
/// Steps take batches by value and hand them back, so a record is only ever
/// owned by the step currently processing it.
pub trait Step: Send + Sync + Debug {
    /// Returns the name of the step.
    fn name(&self) -> &str;

    /// Fields the step reads.
    fn inputs(&self) -> Vec<&str> {
        Vec::new()
    }

    /// Fields the step writes.
    fn outputs(&self) -> Vec<&str> {
        Vec::new()
    }

    /// Categories describing the step.
    fn categories(&self) -> &[StepCategory] {
        &[]
    }

    /// Returns true if the step must see all records at once.
    ///
    /// Filters and writers are global: splitting their input would change
    /// the result (a writer would only keep the last batch).
    fn is_global(&self) -> bool {
        false
    }

    /// Processes one batch.
    ///
    /// # Errors
    ///
    /// Returns an error if a record lacks a required field, a field has the
    /// wrong shape, or an external call fails.
    fn process(&self, batch: Batch) -> Result<Batch>;

    /// Processes several input batches, one output batch per input.
    fn process_all(&self, inputs: Vec<Batch>) -> Result<Vec<Batch>> {
        inputs.into_iter().map(|batch| self.process(batch)).collect()
    }
}

/// A simple function-based step.
pub struct FnStep<F>
where
    F: Fn(Batch) -> Result<Batch> + Send + Sync,
{
    name: String,
    global: bool,
    func: F,
}

impl<F> FnStep<F>
where
    F: Fn(Batch) -> Result<Batch> + Send + Sync,
{
    /// Creates a new function-based step.
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            global: false,
            func,
        }
    }

    /// Marks the step as global.
    #[must_use]
    pub fn global(mut self) -> Self {
        self.global = true;
        self
    }
}

impl<F> Debug for FnStep<F>
where
    F: Fn(Batch) -> Result<Batch> + Send + Sync,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnStep")
            .field("name", &self.name)
            .field("global", &self.global)
            .finish()
    }
}

impl<F> Step for FnStep<F>
where
    F: Fn(Batch) -> Result<Batch> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn is_global(&self) -> bool {
        self.global
    }

    fn process(&self, batch: Batch) -> Result<Batch> {
        (self.func)(batch)
    }
}

/// Builds the `InvalidField` error for a `messages` value that is not a list.
pub(crate) fn not_a_list(step: &str, index: usize) -> ChatflowError {
    ChatflowError::invalid_field(step, "messages", index, "expected a list of messages")
}

/// Builds the `InvalidField` error for a message entry that is not an object.
pub(crate) fn not_a_message(step: &str, index: usize, position: usize) -> ChatflowError {
    ChatflowError::invalid_field(
        step,
        "messages",
        index,
        format!("entry {position} is not a role/content object"),
    )
}
