//! Bridge from async generation clients to the blocking [`Generator`] trait.

use super::Generator;
use crate::errors::{GenerationError, Result};
use async_trait::async_trait;
use std::fmt;
use tokio::runtime::{Builder, Runtime};

/// An asynchronous text generation capability.
#[async_trait]
pub trait AsyncGenerator: Send + Sync {
    /// Generates text for the prompt.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Runs an [`AsyncGenerator`] to completion on a private runtime.
///
/// Each call blocks the current thread until the async call resolves. No
/// retry or timeout is added. Calling this from inside an async runtime
/// panics, as with any nested `block_on`.
pub struct BlockingGenerator<G> {
    inner: G,
    runtime: Runtime,
}

impl<G: AsyncGenerator> BlockingGenerator<G> {
    /// Wraps an async generator with a current-thread runtime.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the runtime cannot be created.
    pub fn new(inner: G) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self { inner, runtime })
    }

    /// Returns the wrapped generator.
    #[must_use]
    pub fn inner(&self) -> &G {
        &self.inner
    }
}

impl<G> fmt::Debug for BlockingGenerator<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockingGenerator").finish_non_exhaustive()
    }
}

impl<G: AsyncGenerator> Generator for BlockingGenerator<G> {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.runtime.block_on(self.inner.generate(prompt))
    }
}
