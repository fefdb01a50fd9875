//! Stock predicates.

use super::Predicate;
use crate::errors::{ChatflowError, Result};
use regex::Regex;

/// Accepts every content.
#[derive(Debug, Clone, Copy, Default)]
pub struct Always;

impl Predicate for Always {
    fn should_process(&self, _content: &str) -> bool {
        true
    }
}

/// Accepts contents containing a fixed substring.
#[derive(Debug, Clone)]
pub struct ContainsPredicate {
    needle: String,
}

impl ContainsPredicate {
    /// Creates a new substring predicate.
    #[must_use]
    pub fn new(needle: impl Into<String>) -> Self {
        Self { needle: needle.into() }
    }
}

impl Predicate for ContainsPredicate {
    fn should_process(&self, content: &str) -> bool {
        content.contains(&self.needle)
    }
}

/// Accepts contents matching a regular expression anywhere.
#[derive(Debug, Clone)]
pub struct RegexPredicate {
    pattern: Regex,
}

impl RegexPredicate {
    /// Compiles a new regex predicate.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the pattern does not compile.
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| ChatflowError::config(format!("invalid predicate pattern '{pattern}': {e}")))?;
        Ok(Self { pattern })
    }

    /// Returns the source pattern.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }
}

impl From<Regex> for RegexPredicate {
    fn from(pattern: Regex) -> Self {
        Self { pattern }
    }
}

impl Predicate for RegexPredicate {
    fn should_process(&self, content: &str) -> bool {
        self.pattern.is_match(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_always() {
        assert!(Always.should_process(""));
        assert!(Always.should_process("anything"));
    }

    #[test]
    fn test_contains() {
        let predicate = ContainsPredicate::new("TODO");
        assert!(predicate.should_process("fix this TODO later"));
        assert!(!predicate.should_process("done"));
    }

    #[test]
    fn test_regex() {
        let predicate = RegexPredicate::new(r"^\s*```").unwrap();
        assert!(predicate.should_process("  ```rust\nfn main() {}```"));
        assert!(!predicate.should_process("plain text"));
        assert_eq!(predicate.as_str(), r"^\s*```");
    }

    #[test]
    fn test_regex_invalid_pattern() {
        let err = RegexPredicate::new("(unclosed").unwrap_err();
        assert_eq!(err.kind(), "config");
        assert!(err.to_string().contains("(unclosed"));
    }
}
