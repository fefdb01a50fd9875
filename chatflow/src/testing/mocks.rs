//! Generator doubles for testing.

use parking_lot::Mutex;

use crate::errors::GenerationError;
use crate::generation::Generator;

#[derive(Debug, Clone)]
enum Mode {
    Responses(Vec<String>),
    Echo,
}

/// A generator that replays scripted responses and records every prompt.
///
/// Responses are returned in order and cycle when exhausted. In echo mode
/// the prompt itself is returned.
#[derive(Debug)]
pub struct ScriptedGenerator {
    mode: Mode,
    fail_after: Option<usize>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    /// Creates a generator replaying the given responses.
    #[must_use]
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            mode: Mode::Responses(responses),
            fail_after: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Creates a generator returning each prompt unchanged.
    #[must_use]
    pub fn echo() -> Self {
        Self {
            mode: Mode::Echo,
            fail_after: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Makes every call after the first `calls` fail.
    #[must_use]
    pub fn fail_after(mut self, calls: usize) -> Self {
        self.fail_after = Some(calls);
        self
    }

    /// Returns the prompts received so far, failed calls included.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    /// Returns the number of calls made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.prompts.lock().len()
    }

    /// Clears recorded prompts.
    pub fn reset(&self) {
        self.prompts.lock().clear();
    }
}

impl Generator for ScriptedGenerator {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let call = {
            let mut prompts = self.prompts.lock();
            prompts.push(prompt.to_string());
            prompts.len() - 1
        };

        if self.fail_after.is_some_and(|limit| call >= limit) {
            return Err(GenerationError::msg(format!("scripted failure on call {}", call + 1)));
        }

        match &self.mode {
            Mode::Echo => Ok(prompt.to_string()),
            Mode::Responses(responses) if responses.is_empty() => {
                Err(GenerationError::msg("no scripted responses"))
            }
            Mode::Responses(responses) => Ok(responses[call % responses.len()].clone()),
        }
    }
}
