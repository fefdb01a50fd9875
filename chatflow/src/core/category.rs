//! Step categories.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A label describing what kind of work a step performs.
///
/// Steps can carry several categories; hosts use them for listing and
/// grouping steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepCategory {
    /// Reshapes fields without adding information.
    Format,
    /// Operates on chat messages.
    Chat,
    /// Produces a transcript.
    Transcript,
    /// Adds or edits individual messages.
    Message,
    /// Calls a generation service.
    TextGeneration,
    /// Prepares data before the main work.
    Preprocessing,
    /// Removes records.
    Filter,
    /// Cleans up low-quality records.
    Cleaning,
    /// Persists records.
    Save,
    /// Writes to the filesystem.
    File,
}

impl fmt::Display for StepCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format => write!(f, "format"),
            Self::Chat => write!(f, "chat"),
            Self::Transcript => write!(f, "transcript"),
            Self::Message => write!(f, "message"),
            Self::TextGeneration => write!(f, "text_generation"),
            Self::Preprocessing => write!(f, "preprocessing"),
            Self::Filter => write!(f, "filter"),
            Self::Cleaning => write!(f, "cleaning"),
            Self::Save => write!(f, "save"),
            Self::File => write!(f, "file"),
        }
    }
}

impl StepCategory {
    /// Returns true if steps in this category have effects outside the batch.
    #[must_use]
    pub fn is_side_effecting(&self) -> bool {
        matches!(self, Self::TextGeneration | Self::Save | Self::File)
    }
}
