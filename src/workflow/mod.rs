//! Workflow definitions and persistence.
//!
//! - [`StepDefinition`] / [`StepType`] / [`StepAction`] - one typed unit of work
//! - [`Workflow`] - steps keyed by identifier plus a start pointer
//! - [`codec`] - JSON document encoding, decoding and file persistence
//! - [`validator`] - advisory static checks
//! - [`planner`] - build a workflow from a natural-language request
//!
//! # Example
//!
//! ```
//! use codeflow::workflow::{self, StepDefinition, StepType, Workflow};
//! use serde_json::json;
//!
//! let mut flow = Workflow::new("reverse", "Generate a string reverser");
//! flow.add_step(
//!     "gen",
//!     StepDefinition::new(StepType::CodeGeneration, "Generate", json!({"task": "reverse a string"}))
//!         .unwrap(),
//! );
//!
//! let text = workflow::to_json(&flow).unwrap();
//! let decoded = workflow::from_json(&text).unwrap();
//! assert_eq!(decoded, flow);
//! ```

pub mod codec;
pub mod definition;
pub mod model;
pub mod planner;
pub mod validator;

pub use codec::{
    decode, encode, from_json, from_value, load_from_file, save_to_file, to_json, to_value,
    StepDocument, WorkflowDocument,
};
pub use definition::{
    ConditionalArgs, EditArgs, FileOperationArgs, GenerationArgs, LoopArgs, SourceArgs,
    StepAction, StepDefinition, StepType, UserInputArgs,
};
pub use model::Workflow;
pub use planner::plan_workflow;
pub use validator::{validate_workflow, ValidationIssue};
