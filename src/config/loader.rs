//! Settings file discovery and loading.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::merger::merge_layers;
use crate::config::schema::Settings;
use crate::error::{CodeflowError, Result};

/// Directory holding project settings.
pub const CONFIG_DIR: &str = ".codeflow";

/// Paths to settings files in priority order (later overrides earlier).
///
/// 1. Project settings (`.codeflow/config.yml`)
/// 2. Local overrides (`.codeflow/config.local.yml`)
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// Project settings: .codeflow/config.yml
    pub project: Option<PathBuf>,

    /// Local overrides: .codeflow/config.local.yml
    pub project_local: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover settings files for the given project root.
    pub fn discover(project_root: &Path) -> Self {
        let dir = project_root.join(CONFIG_DIR);
        Self {
            project: existing(dir.join("config.yml")),
            project_local: existing(dir.join("config.local.yml")),
        }
    }

    /// Returns all existing paths in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        self.project.iter().chain(self.project_local.iter()).collect()
    }
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    if path.exists() {
        Some(path)
    } else {
        None
    }
}

/// Find the project root by walking up from `start`.
///
/// A `.codeflow` directory wins over a `.git` directory at the same or a
/// higher level.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        if current.join(CONFIG_DIR).is_dir() {
            return Some(current);
        }

        if current.join(".git").exists() {
            return Some(current);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Parse YAML content into settings.
///
/// Empty content yields defaults.
pub fn parse_settings(content: &str, source_path: &Path) -> Result<Settings> {
    if content.trim().is_empty() {
        return Ok(Settings::default());
    }
    serde_yaml::from_str(content).map_err(|e| CodeflowError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load a settings file as a raw YAML value (for merging).
fn load_settings_value(path: &Path) -> Result<serde_yaml::Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CodeflowError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            CodeflowError::Io(e)
        }
    })?;

    if content.trim().is_empty() {
        return Ok(serde_yaml::Value::Mapping(Default::default()));
    }

    serde_yaml::from_str(&content).map_err(|e| CodeflowError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load a single settings file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist and
/// `ConfigParseError` if the YAML is invalid.
pub fn load_settings_file(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CodeflowError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            CodeflowError::Io(e)
        }
    })?;

    parse_settings(&content, path)
}

/// Load settings for a project.
///
/// With `config_override`, loads only that file, which must exist.
/// Otherwise merges the discovered project files; none at all means
/// defaults.
pub fn load_settings(project_root: &Path, config_override: Option<&Path>) -> Result<Settings> {
    if let Some(path) = config_override {
        debug!("Loading settings from {}", path.display());
        return load_settings_file(path);
    }

    let paths = ConfigPaths::discover(project_root);
    let existing = paths.all_existing();
    if existing.is_empty() {
        debug!("No settings files under {}", project_root.display());
        return Ok(Settings::default());
    }

    let mut layers = Vec::new();
    for path in &existing {
        debug!("Loading settings from {}", path.display());
        layers.push(load_settings_value(path)?);
    }

    serde_yaml::from_value(merge_layers(&layers)).map_err(|e| CodeflowError::ConfigParseError {
        path: project_root.join(CONFIG_DIR).join("config.yml"),
        message: format!("Failed to parse merged settings: {}", e),
    })
}
