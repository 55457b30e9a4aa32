//! Completion providers.
//!
//! The dispatcher talks to upstream inference through [`CompletionProvider`]:
//! one structured prompt in, one text completion out. Provider-side retries
//! and rate limiting are the provider's business; a failed call surfaces
//! immediately as an error.

pub mod groq;

pub use groq::{GroqProvider, DEFAULT_GROQ_MODEL};

use async_trait::async_trait;

use crate::error::Result;

/// A single-call completion backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Request one completion for a system + user turn.
    async fn complete(&self, system: &str, user: &str) -> Result<String>;

    /// Identifier of the model served by this provider.
    fn model_id(&self) -> &str;
}
