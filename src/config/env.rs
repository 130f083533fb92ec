//! Environment variable overrides for settings.
//!
//! Overrides are read from an explicit map so callers (and tests) decide
//! whether the process environment is consulted.

use std::collections::HashMap;

use tracing::warn;

use crate::config::schema::Settings;

/// Overrides `generation.base_url`.
pub const BASE_URL_VAR: &str = "CODEFLOW_BASE_URL";
/// Overrides `generation.model`.
pub const MODEL_VAR: &str = "CODEFLOW_MODEL";
/// Overrides `generation.api_key_env`.
pub const API_KEY_ENV_VAR: &str = "CODEFLOW_API_KEY_ENV";
/// Overrides `retry.max_retries`.
pub const MAX_RETRIES_VAR: &str = "CODEFLOW_MAX_RETRIES";

/// Snapshot the process environment.
pub fn load_system_env() -> HashMap<String, String> {
    std::env::vars().collect()
}

/// Apply `CODEFLOW_*` overrides on top of file settings.
///
/// An unparsable `CODEFLOW_MAX_RETRIES` is ignored with a warning.
pub fn apply_env_overrides(settings: &mut Settings, env: &HashMap<String, String>) {
    if let Some(url) = non_empty(env, BASE_URL_VAR) {
        settings.generation.base_url = url.to_string();
    }
    if let Some(model) = non_empty(env, MODEL_VAR) {
        settings.generation.model = model.to_string();
    }
    if let Some(var) = non_empty(env, API_KEY_ENV_VAR) {
        settings.generation.api_key_env = var.to_string();
    }
    if let Some(raw) = non_empty(env, MAX_RETRIES_VAR) {
        match raw.parse::<u32>() {
            Ok(n) => settings.retry.max_retries = n,
            Err(_) => warn!("Ignoring {}={:?}: not a count", MAX_RETRIES_VAR, raw),
        }
    }
}

/// Look up the API key named by `generation.api_key_env`.
pub fn resolve_api_key(settings: &Settings, env: &HashMap<String, String>) -> Option<String> {
    non_empty(env, &settings.generation.api_key_env).map(str::to_string)
}

fn non_empty<'a>(env: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    env.get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}
