//! Codeflow - linear code-generation workflows.
//!
//! A workflow is a set of typed steps (generate, edit, review, refactor,
//! test, document, ask the user, read/write files, branch, loop) joined by
//! success and failure edges. The engine walks those edges, storing each
//! step's result so later steps and conditions can read it.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`condition`] - Guard and branch expression language
//! - [`config`] - Settings loading
//! - [`error`] - Error types and result aliases
//! - [`generation`] - Text generation service clients
//! - [`runner`] - Workflow engine, result store and confirmation gate
//! - [`steps`] - Per-step-type execution
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//! - [`workflow`] - Step definitions, workflows and their JSON form
//!
//! # Example
//!
//! ```
//! use codeflow::generation::ScriptedGenerator;
//! use codeflow::runner::WorkflowEngine;
//! use codeflow::ui::MockUI;
//! use codeflow::workflow::{StepDefinition, StepType, Workflow};
//! use serde_json::json;
//!
//! let generator = ScriptedGenerator::new().with_response("```python\nprint('hi')\n```");
//! let workflow = Workflow::new("hello", "").with_step(
//!     "gen",
//!     StepDefinition::new(StepType::CodeGeneration, "Generate", json!({"task": "say hi"}))
//!         .unwrap(),
//! );
//!
//! let mut engine = WorkflowEngine::new(workflow, &generator);
//! let report = engine.execute(None, &mut MockUI::new()).unwrap();
//! assert!(report.completed());
//! assert_eq!(engine.results().get("gen").unwrap().code(), Some("print('hi')"));
//! ```

pub mod cli;
pub mod condition;
pub mod config;
pub mod error;
pub mod generation;
pub mod runner;
pub mod steps;
pub mod ui;
pub mod workflow;

pub use error::{CodeflowError, Result};
