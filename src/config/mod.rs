//! Settings loading for Codeflow.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Deep merging of layered files in [`merger`]
//! - Environment overrides in [`env`]
//!
//! # Example
//!
//! ```
//! use codeflow::config::load_settings;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let dir = temp.path().join(".codeflow");
//! fs::create_dir_all(&dir).unwrap();
//! fs::write(dir.join("config.yml"), "generation:\n  model: local").unwrap();
//!
//! let settings = load_settings(temp.path(), None).unwrap();
//! assert_eq!(settings.generation.model, "local");
//! ```
//!
//! # Settings File Locations
//!
//! 1. Project settings (`.codeflow/config.yml`)
//! 2. Local overrides (`.codeflow/config.local.yml`)
//!
//! `CODEFLOW_*` environment variables are applied last.

pub mod env;
pub mod loader;
pub mod merger;
pub mod schema;

pub use env::{apply_env_overrides, load_system_env, resolve_api_key};
pub use loader::{
    find_project_root, load_settings, load_settings_file, parse_settings, ConfigPaths, CONFIG_DIR,
};
pub use merger::{deep_merge, merge_layers};
pub use schema::{GenerationSettings, RetrySettings, Settings};
