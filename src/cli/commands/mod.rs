//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results. Commands that
//! talk to the generation service also expose an `execute_with` taking the
//! generator, so they can run against a scripted one.

pub mod context;
pub mod dispatcher;
pub mod plan;
pub mod run;
pub mod show;
pub mod validate;

pub use context::CommandContext;
pub use dispatcher::{Command, CommandDispatcher, CommandResult};
