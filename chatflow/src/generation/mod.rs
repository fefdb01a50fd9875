//! Capabilities injected into the rewrite step.
//!
//! The rewrite step never talks to a generation service directly. It is
//! handed a [`Generator`] that maps a prompt to generated text and a
//! [`Predicate`] that decides which message contents are eligible. Both are
//! plain traits so tests and hosts can supply their own implementations;
//! closures implement them out of the box.

mod blocking;
mod predicates;

pub use blocking::{AsyncGenerator, BlockingGenerator};
pub use predicates::{Always, ContainsPredicate, RegexPredicate};

use crate::errors::GenerationError;

/// A text generation capability.
///
/// Implementations block until the generated text is available. Latency,
/// retries and timeouts are the implementation's concern.
#[cfg_attr(test, mockall::automock)]
pub trait Generator: Send + Sync {
    /// Generates text for the prompt.
    fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

impl<F> Generator for F
where
    F: Fn(&str) -> Result<String, GenerationError> + Send + Sync,
{
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self(prompt)
    }
}

/// Decides whether a message content should be rewritten.
///
/// Predicates are expected to be pure.
#[cfg_attr(test, mockall::automock)]
pub trait Predicate: Send + Sync {
    /// Returns true if the content is eligible.
    fn should_process(&self, content: &str) -> bool;
}

impl<F> Predicate for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn should_process(&self, content: &str) -> bool {
        self(content)
    }
}

/// Builds the generation prompt for a message.
///
/// The original content is fenced in triple backticks, followed by a blank
/// line and the instructions.
#[must_use]
pub fn build_prompt(content: &str, instructions: &str) -> String {
    format!("```{content}```\n\n{instructions}")
}
