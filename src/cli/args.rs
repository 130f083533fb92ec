//! CLI argument definitions.
//!
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Codeflow - run code-generation workflows.
#[derive(Debug, Parser)]
#[command(name = "codeflow")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to settings file (overrides default .codeflow/config.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a workflow file
    Run(RunArgs),

    /// Check a workflow file for problems
    Validate(ValidateArgs),

    /// Describe the steps of a workflow file
    Show(ShowArgs),

    /// Ask the generation service to draft a workflow
    Plan(PlanArgs),
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RunArgs {
    /// Workflow file (JSON)
    pub file: PathBuf,

    /// Start at this step instead of the workflow's start step
    #[arg(long, value_name = "STEP")]
    pub from: Option<String>,

    /// Confirm each step's result before continuing
    #[arg(short, long)]
    pub interactive: bool,

    /// Never prompt; answers come from CODEFLOW_PROMPT_<KEY> or defaults
    #[arg(long, conflicts_with = "interactive")]
    pub non_interactive: bool,

    /// Write a JSON snapshot of the run to this path
    #[arg(long, value_name = "PATH")]
    pub results_out: Option<PathBuf>,
}

/// Arguments for the `validate` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ValidateArgs {
    /// Workflow file (JSON)
    pub file: PathBuf,
}

/// Arguments for the `show` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ShowArgs {
    /// Workflow file (JSON)
    pub file: PathBuf,
}

/// Arguments for the `plan` command.
#[derive(Debug, Clone, clap::Args)]
pub struct PlanArgs {
    /// What the workflow should accomplish
    pub request: String,

    /// Where to save the drafted workflow
    #[arg(short, long, value_name = "PATH", default_value = "workflow.json")]
    pub output: PathBuf,
}
