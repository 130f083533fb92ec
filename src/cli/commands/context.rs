//! Shared state for command execution.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::{apply_env_overrides, load_settings, load_system_env, resolve_api_key, Settings};
use crate::error::Result;
use crate::generation::{ChatCompletionsClient, RetryPolicy, RetryingGenerator};

/// Where a command runs and which settings it sees.
#[derive(Debug, Clone)]
pub struct CommandContext {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    env: HashMap<String, String>,
}

impl CommandContext {
    /// Create a context for the given project root, reading the process environment.
    pub fn new(project_root: PathBuf) -> Self {
        Self {
            project_root,
            config_path: None,
            env: load_system_env(),
        }
    }

    /// Use an explicit settings file instead of discovery.
    pub fn with_config(mut self, config_path: Option<PathBuf>) -> Self {
        self.config_path = config_path;
        self
    }

    /// Replace the environment used for overrides and the API key.
    pub fn with_env(mut self, env: HashMap<String, String>) -> Self {
        self.env = env;
        self
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Load settings and apply `CODEFLOW_*` overrides.
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = load_settings(&self.project_root, self.config_path.as_deref())?;
        apply_env_overrides(&mut settings, &self.env);
        Ok(settings)
    }

    /// Build the HTTP generator with rate-limit retries.
    pub fn generator(
        &self,
        settings: &Settings,
    ) -> Result<RetryingGenerator<ChatCompletionsClient>> {
        let api_key = resolve_api_key(settings, &self.env);
        if api_key.is_none() {
            warn!(
                "{} is not set; requests are sent without an API key",
                settings.generation.api_key_env
            );
        }

        let client = ChatCompletionsClient::new(&settings.generation, api_key)?;
        debug!("Generation endpoint: {}", client.endpoint());
        Ok(RetryingGenerator::new(
            client,
            RetryPolicy::from(&settings.retry),
        ))
    }
}
