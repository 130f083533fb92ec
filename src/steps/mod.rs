//! Step execution.
//!
//! - [`StepExecutor`] - run one step definition against a [`StepContext`]
//! - [`StepOutput`] / [`ResultRecord`] - what a step produced
//! - [`extract`] - code and JSON extraction from generation responses
//! - [`source`] - where code-processing steps get their input

pub mod executor;
pub mod extract;
pub mod output;
pub mod source;

pub use executor::{StepContext, StepExecutor, DEFAULT_LANGUAGE};
pub use extract::{extract_code_block, extract_json_block};
pub use output::{ResultRecord, StepOutput};
pub use source::{resolve_source, SourceError};
