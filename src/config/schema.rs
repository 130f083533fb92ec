//! Settings schema.
//!
//! Maps `.codeflow/config.yml` onto typed settings. Every field has a
//! default, so an empty or absent file yields a usable configuration.

use serde::{Deserialize, Serialize};

use crate::ui::OutputMode;

/// Root settings structure for `.codeflow/config.yml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Generation service connection.
    pub generation: GenerationSettings,

    /// Backoff for rate-limited generation calls.
    pub retry: RetrySettings,

    /// Pause for confirmation after each step.
    #[serde(skip_serializing_if = "is_false")]
    pub interactive: bool,

    /// Default output mode: verbose, normal or quiet
    pub output: OutputMode,
}

/// Connection settings for an OpenAI-compatible chat completions service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Base URL; `/chat/completions` is appended.
    pub base_url: String,

    /// Model name sent with every request.
    pub model: String,

    /// Name of the environment variable holding the API key.
    pub api_key_env: String,

    /// System message preceding every prompt.
    pub system_prompt: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Language used by code prompts and fence extraction.
    pub language: String,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            system_prompt: "You are a helpful assistant.".to_string(),
            timeout_secs: 120,
            language: crate::steps::DEFAULT_LANGUAGE.to_string(),
        }
    }
}

/// Exponential backoff applied to rate-limited generation calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Retries after the first attempt.
    pub max_retries: u32,

    /// Delay before the first retry, in milliseconds.
    pub initial_delay_ms: u64,

    /// Upper bound on any single delay, in milliseconds.
    pub max_delay_ms: u64,

    /// Factor applied to the delay after each retry.
    pub multiplier: f64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay_ms: 1000,
            max_delay_ms: 30_000,
            multiplier: 2.0,
        }
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}
