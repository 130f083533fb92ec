//! Workflow execution.
//!
//! - [`WorkflowEngine`] - traversal, guards, routing and the confirmation pause
//! - [`ResultStore`] - per-run results consulted by later steps and conditions
//! - [`confirmation`] - the console accept/reject/edit gate
//! - [`RunSnapshot`] - JSON record of a finished run

pub mod confirmation;
pub mod engine;
pub mod snapshot;
pub mod store;

pub use confirmation::{confirm_result, EDIT_TERMINATOR};
pub use engine::{Decision, PendingConfirmation, RunReport, Traversal, WorkflowEngine};
pub use snapshot::RunSnapshot;
pub use store::ResultStore;
