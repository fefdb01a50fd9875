//! Error types for chatflow steps.
//!
//! Every step surfaces failures as a [`ChatflowError`]. There is no soft
//! error path: the caller decides whether to abort the batch or the run.

use std::collections::HashMap;
use thiserror::Error;

/// The main error type for chatflow operations.
#[derive(Debug, Error)]
pub enum ChatflowError {
    /// A field the step requires is absent from a record.
    #[error("Step '{step}': record {record} is missing required field '{field}'")]
    MissingField {
        /// The step that needed the field.
        step: String,
        /// The missing field name.
        field: String,
        /// Index of the record within the batch.
        record: usize,
    },

    /// A field is present but has the wrong shape.
    #[error("Step '{step}': record {record} has invalid field '{field}': {reason}")]
    InvalidField {
        /// The step that read the field.
        step: String,
        /// The offending field name.
        field: String,
        /// Index of the record within the batch.
        record: usize,
        /// What was wrong with the value.
        reason: String,
    },

    /// The generation capability failed.
    #[error("Step '{step}': generation failed for record {record}, message {message}: {source}")]
    Generation {
        /// The step that called the generator.
        step: String,
        /// Index of the record within the batch.
        record: usize,
        /// Index of the message within the record.
        message: usize,
        /// The error returned by the generator.
        #[source]
        source: GenerationError,
    },

    /// Invalid step configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChatflowError {
    /// Creates a missing field error.
    #[must_use]
    pub fn missing_field(step: impl Into<String>, field: impl Into<String>, record: usize) -> Self {
        Self::MissingField {
            step: step.into(),
            field: field.into(),
            record,
        }
    }

    /// Creates an invalid field error.
    #[must_use]
    pub fn invalid_field(
        step: impl Into<String>,
        field: impl Into<String>,
        record: usize,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidField {
            step: step.into(),
            field: field.into(),
            record,
            reason: reason.into(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Returns a stable, machine-readable kind for the error.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingField { .. } => "missing_field",
            Self::InvalidField { .. } => "invalid_field",
            Self::Generation { .. } => "generation",
            Self::Config(_) => "config",
            Self::Serialization(_) => "serialization",
            Self::Io(_) => "io",
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("type".to_string(), serde_json::json!(self.kind()));

        match self {
            Self::MissingField { step, field, record } => {
                map.insert("step".to_string(), serde_json::json!(step));
                map.insert("field".to_string(), serde_json::json!(field));
                map.insert("record".to_string(), serde_json::json!(record));
            }
            Self::InvalidField { step, field, record, reason } => {
                map.insert("step".to_string(), serde_json::json!(step));
                map.insert("field".to_string(), serde_json::json!(field));
                map.insert("record".to_string(), serde_json::json!(record));
                map.insert("reason".to_string(), serde_json::json!(reason));
            }
            Self::Generation { step, record, message, .. } => {
                map.insert("step".to_string(), serde_json::json!(step));
                map.insert("record".to_string(), serde_json::json!(record));
                map.insert("message_index".to_string(), serde_json::json!(message));
            }
            Self::Config(_) | Self::Serialization(_) | Self::Io(_) => {}
        }

        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}

/// Error returned by a generation capability.
///
/// The payload is opaque so callers can return whatever their client produces.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct GenerationError(#[from] anyhow::Error);

impl GenerationError {
    /// Creates a generation error from a message.
    #[must_use]
    pub fn msg(message: impl Into<String>) -> Self {
        Self(anyhow::anyhow!(message.into()))
    }

    /// Returns the underlying error.
    #[must_use]
    pub fn into_inner(self) -> anyhow::Error {
        self.0
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = ChatflowError> = std::result::Result<T, E>;
