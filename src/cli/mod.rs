//! Command-line interface for Codeflow.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, PlanArgs, RunArgs, ShowArgs, ValidateArgs};
pub use commands::{Command, CommandContext, CommandDispatcher, CommandResult};
