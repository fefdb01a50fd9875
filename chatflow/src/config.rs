//! Configuration types for chatflow steps.
//!
//! Step configurations deserialize from JSON (or any serde format) and build
//! into boxed [`Step`]s. The rewrite step additionally needs a generator,
//! which is never part of the configuration.

use crate::errors::{ChatflowError, Result};
use crate::generation::{Always, ContainsPredicate, Generator, Predicate, RegexPredicate};
use crate::steps::{
    DropEmpty, FormatTranscript, InsertMessage, RewriteMessages, SaveToJsonl, Step, DEFAULT_JSONL_PATH,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration of a single step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepConfig {
    /// Renders messages into a transcript.
    FormatTranscript {
        /// Optional step name.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    /// Inserts a message built from the `content` field.
    InsertMessage {
        /// Optional step name.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        /// Insert position; negative counts from the end.
        index: i64,
        /// Role of the inserted message.
        role: String,
    },
    /// Rewrites selected messages with generated text.
    RewriteMessages {
        /// Optional step name.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        /// Instructions appended to every prompt.
        instructions: String,
        /// Role whose messages are candidates.
        target_role: String,
        /// Which contents are eligible.
        #[serde(default)]
        predicate: PredicateConfig,
    },
    /// Drops records with empty values.
    DropEmpty {
        /// Optional step name.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        /// Columns to check; every field when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        columns: Option<Vec<String>>,
    },
    /// Writes messages to a JSONL file.
    SaveToJsonl {
        /// Optional step name.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        /// Output path.
        #[serde(default = "default_file_path")]
        file_path: PathBuf,
    },
}

fn default_file_path() -> PathBuf {
    PathBuf::from(DEFAULT_JSONL_PATH)
}

/// Configuration of a rewrite predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PredicateConfig {
    /// Every content is eligible.
    #[default]
    Always,
    /// Contents matching a regular expression.
    Regex {
        /// The pattern.
        pattern: String,
    },
    /// Contents containing a substring.
    Contains {
        /// The substring.
        needle: String,
    },
}

impl PredicateConfig {
    /// Builds the predicate.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an invalid regex.
    pub fn build(&self) -> Result<Arc<dyn Predicate>> {
        Ok(match self {
            Self::Always => Arc::new(Always),
            Self::Regex { pattern } => Arc::new(RegexPredicate::new(pattern)?),
            Self::Contains { needle } => Arc::new(ContainsPredicate::new(needle.clone())),
        })
    }
}

impl StepConfig {
    /// Parses a step configuration from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parses a list of step configurations from JSON text.
    pub fn list_from_json(text: &str) -> Result<Vec<Self>> {
        Ok(serde_json::from_str(text)?)
    }

    /// Returns the configured step type as written in configuration.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::FormatTranscript { .. } => "format_transcript",
            Self::InsertMessage { .. } => "insert_message",
            Self::RewriteMessages { .. } => "rewrite_messages",
            Self::DropEmpty { .. } => "drop_empty",
            Self::SaveToJsonl { .. } => "save_to_jsonl",
        }
    }

    /// Returns true if building this step needs a generator.
    #[must_use]
    pub fn needs_generator(&self) -> bool {
        matches!(self, Self::RewriteMessages { .. })
    }

    /// Builds the configured step.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a rewrite step has no generator or
    /// its predicate is invalid.
    pub fn build(&self, generator: Option<Arc<dyn Generator>>) -> Result<Box<dyn Step>> {
        let step: Box<dyn Step> = match self {
            Self::FormatTranscript { name } => Box::new(match name {
                Some(name) => FormatTranscript::named(name.clone()),
                None => FormatTranscript::new(),
            }),
            Self::InsertMessage { name, index, role } => {
                let step = InsertMessage::new(*index, role.clone());
                Box::new(match name {
                    Some(name) => step.with_name(name.clone()),
                    None => step,
                })
            }
            Self::RewriteMessages {
                name,
                instructions,
                target_role,
                predicate,
            } => {
                let generator = generator.ok_or_else(|| {
                    ChatflowError::config(format!(
                        "step '{}' requires a generator",
                        name.as_deref().unwrap_or(self.type_name())
                    ))
                })?;
                let step = RewriteMessages::new(instructions.clone(), target_role.clone(), predicate.build()?, generator);
                Box::new(match name {
                    Some(name) => step.with_name(name.clone()),
                    None => step,
                })
            }
            Self::DropEmpty { name, columns } => {
                let step = match columns {
                    Some(columns) => DropEmpty::with_columns(columns.iter().cloned()),
                    None => DropEmpty::new(),
                };
                Box::new(match name {
                    Some(name) => step.with_name(name.clone()),
                    None => step,
                })
            }
            Self::SaveToJsonl { name, file_path } => {
                let step = SaveToJsonl::new(file_path.clone());
                Box::new(match name {
                    Some(name) => step.with_name(name.clone()),
                    None => step,
                })
            }
        };

        Ok(step)
    }
}
