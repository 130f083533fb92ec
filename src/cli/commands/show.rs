//! Show command implementation.
//!
//! The `codeflow show` command prints a workflow's steps and edges.

use crate::cli::args::ShowArgs;
use crate::error::{CodeflowError, Result};
use crate::ui::UserInterface;
use crate::workflow::{load_from_file, StepDefinition, Workflow};

use super::dispatcher::{Command, CommandResult};

/// The show command implementation.
pub struct ShowCommand {
    args: ShowArgs,
}

impl ShowCommand {
    pub fn new(args: ShowArgs) -> Self {
        Self { args }
    }
}

/// Lines describing one step: type and description, then guard and edges.
pub fn describe_step(step_id: &str, step: &StepDefinition) -> Vec<String> {
    let mut lines = vec![format!(
        "{} [{}] {}",
        step_id,
        step.step_type(),
        step.description()
    )];
    if let Some(guard) = step.condition() {
        lines.push(format!("    if: {}", guard));
    }
    if let Some(next) = step.next_on_success() {
        lines.push(format!("    on success -> {}", next));
    }
    if let Some(next) = step.next_on_failure() {
        lines.push(format!("    on failure -> {}", next));
    }
    lines
}

fn describe_workflow(workflow: &Workflow) -> Vec<String> {
    let mut lines = Vec::new();
    if !workflow.description().is_empty() {
        lines.push(workflow.description().to_string());
    }
    lines.push(format!(
        "Start: {}",
        workflow.start_step().unwrap_or("(none)")
    ));
    for (id, step) in workflow.steps() {
        lines.extend(describe_step(id, step));
    }
    let chain = workflow.success_chain();
    if chain.len() > 1 {
        lines.push(format!("Success path: {}", chain.join(" -> ")));
    }
    lines
}

impl Command for ShowCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let workflow = match load_from_file(&self.args.file) {
            Ok(w) => w,
            Err(e @ CodeflowError::WorkflowNotFound { .. }) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(2));
            }
            Err(e @ CodeflowError::WorkflowDecode { .. }) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(1));
            }
            Err(e) => return Err(e),
        };

        ui.show_header(&format!("Workflow '{}'", workflow.name()));
        for line in describe_workflow(&workflow) {
            ui.message(&line);
        }
        Ok(CommandResult::success())
    }
}
