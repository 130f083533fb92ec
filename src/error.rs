//! Error types for Codeflow operations.
//!
//! This module defines [`CodeflowError`], the primary error type used
//! throughout the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Configuration errors (missing start step, dangling successor, bad
//!   arguments) are returned as `Err` and halt a traversal
//! - Recoverable step errors are not errors at this level; they are stored
//!   as an `error` field in the step's result record
//! - Use `anyhow::Error` (via `CodeflowError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

use crate::condition::ConditionError;
use crate::generation::GenerationError;

/// Core error type for Codeflow operations.
#[derive(Debug, Error)]
pub enum CodeflowError {
    /// Traversal started without an explicit or configured start step.
    #[error("No start step: the workflow has no start_step and none was given")]
    NoStartStep,

    /// A successor identifier does not name a step in the workflow.
    #[error("Unknown step: '{step}' is not defined in the workflow")]
    UnknownStep { step: String },

    /// A step type string is not one of the supported step types.
    #[error("Unsupported step type: {step_type}")]
    UnsupportedStepType { step_type: String },

    /// A step's arguments do not match what its type requires.
    #[error("Invalid arguments for step '{step}': {message}")]
    InvalidArguments { step: String, message: String },

    /// A workflow document could not be decoded.
    #[error("Failed to decode workflow: {message}")]
    WorkflowDecode { message: String },

    /// Workflow file not found.
    #[error("Workflow not found: {path}")]
    WorkflowNotFound { path: PathBuf },

    /// Settings file not found at an explicitly given location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse the settings file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// A condition could not be parsed or evaluated.
    #[error("Condition error: {0}")]
    Condition(#[from] ConditionError),

    /// The generation service failed.
    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// Step execution failed.
    #[error("Step '{step}' failed: {message}")]
    StepExecutionError { step: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error wrapper.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CodeflowError {
    /// Whether this error is a workflow configuration problem that halts
    /// traversal rather than being recorded against a step.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            CodeflowError::NoStartStep
                | CodeflowError::UnknownStep { .. }
                | CodeflowError::UnsupportedStepType { .. }
                | CodeflowError::InvalidArguments { .. }
        )
    }

    /// The step identifier this error is about, when it names one.
    pub fn step(&self) -> Option<&str> {
        match self {
            CodeflowError::UnknownStep { step } | CodeflowError::InvalidArguments { step, .. } => {
                Some(step)
            }
            _ => None,
        }
    }
}

/// Result type alias for Codeflow operations.
pub type Result<T> = std::result::Result<T, CodeflowError>;
