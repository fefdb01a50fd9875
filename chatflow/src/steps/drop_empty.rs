//! Empty-row filtering.

use super::Step;
use crate::core::{value_text, Batch, Record, StepCategory};
use crate::errors::Result;
use serde_json::Value;

const CATEGORIES: &[StepCategory] = &[
    StepCategory::Preprocessing,
    StepCategory::Filter,
    StepCategory::Cleaning,
];

/// Drops records holding an empty value in any checked column.
///
/// A value is empty when it is `null` or its text is blank after trimming.
/// With no `columns` configured every field of the record is checked.
/// Listed columns missing from a record are skipped rather than counted as
/// empty, so a record with nothing to check is kept.
#[derive(Debug, Clone)]
pub struct DropEmpty {
    name: String,
    columns: Option<Vec<String>>,
}

impl DropEmpty {
    /// Creates a filter that checks every field.
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: "drop_empty".to_string(),
            columns: None,
        }
    }

    /// Creates a filter that checks only the given columns.
    #[must_use]
    pub fn with_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: "drop_empty".to_string(),
            columns: Some(columns.into_iter().map(Into::into).collect()),
        }
    }

    /// Sets the step name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Returns the configured columns.
    #[must_use]
    pub fn columns(&self) -> Option<&[String]> {
        self.columns.as_deref()
    }

    /// Returns true if any checked column of the record is empty.
    #[must_use]
    pub fn has_empty(&self, record: &Record) -> bool {
        match &self.columns {
            Some(columns) => columns
                .iter()
                .filter_map(|column| record.get(column))
                .any(is_empty_value),
            None => record.fields().any(|(_, value)| is_empty_value(value)),
        }
    }
}

impl Default for DropEmpty {
    fn default() -> Self {
        Self::new()
    }
}

fn is_empty_value(value: &Value) -> bool {
    value.is_null() || value_text(value).trim().is_empty()
}

impl Step for DropEmpty {
    fn name(&self) -> &str {
        &self.name
    }

    fn inputs(&self) -> Vec<&str> {
        self.columns
            .as_ref()
            .map(|columns| columns.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    fn categories(&self) -> &[StepCategory] {
        CATEGORIES
    }

    fn is_global(&self) -> bool {
        true
    }

    fn process(&self, mut batch: Batch) -> Result<Batch> {
        let before = batch.len();
        batch.retain(|record| !self.has_empty(record));

        tracing::debug!(
            step = %self.name,
            kept = batch.len(),
            dropped = before - batch.len(),
            "Filtered empty records"
        );
        Ok(batch)
    }
}
