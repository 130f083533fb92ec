//! One-shot JSON snapshot of a run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

use super::engine::RunReport;
use super::store::ResultStore;

/// Everything worth keeping after a run: what ran, when, and what it produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSnapshot {
    pub workflow: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub halted_at: Option<String>,
    pub visited: Vec<String>,
    pub results: ResultStore,
}

impl RunSnapshot {
    /// Build a snapshot from a finished run, stamped with the current time.
    pub fn new(
        workflow: impl Into<String>,
        started_at: DateTime<Utc>,
        report: &RunReport,
        results: &ResultStore,
    ) -> Self {
        Self {
            workflow: workflow.into(),
            started_at,
            finished_at: Utc::now(),
            halted_at: report.halted_at.clone(),
            visited: report.visited.clone(),
            results: results.clone(),
        }
    }

    /// Write the snapshot as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}
