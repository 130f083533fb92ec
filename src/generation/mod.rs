//! Text generation service.
//!
//! The engine only needs one capability from the outside world:
//! turn a prompt into a response. That capability is the
//! [`TextGenerator`] trait. This module provides:
//!
//! - [`ChatCompletionsClient`] - blocking HTTP client for OpenAI-compatible services
//! - [`RetryingGenerator`] - exponential backoff on rate limiting
//! - [`ScriptedGenerator`] - queued responses for tests and offline runs
//! - [`prompts`] - the prompt templates sent by each step type

pub mod http;
pub mod prompts;
pub mod retry;
pub mod scripted;

pub use http::ChatCompletionsClient;
pub use retry::{RetryPolicy, RetryingGenerator};
pub use scripted::ScriptedGenerator;

use thiserror::Error;

/// Errors returned by a [`TextGenerator`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    /// The service asked us to slow down. Safe to retry after a delay.
    #[error("rate limited: {message}")]
    RateLimited { message: String },

    /// Any other transport or service failure.
    #[error("request failed: {message}")]
    Request { message: String },

    /// The service answered but the answer had no text.
    #[error("empty response from generation service")]
    EmptyResponse,
}

impl GenerationError {
    /// Whether the caller may retry the same request.
    pub fn is_transient(&self) -> bool {
        matches!(self, GenerationError::RateLimited { .. })
    }
}

/// Something that can turn a prompt into text.
pub trait TextGenerator {
    /// Generate a response for `prompt`.
    fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

impl<T: TextGenerator + ?Sized> TextGenerator for &T {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        (**self).generate(prompt)
    }
}

impl<T: TextGenerator + ?Sized> TextGenerator for Box<T> {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        (**self).generate(prompt)
    }
}
