//! Validate command implementation.
//!
//! The `codeflow validate` command runs the static workflow checks.

use crate::cli::args::ValidateArgs;
use crate::error::{CodeflowError, Result};
use crate::ui::UserInterface;
use crate::workflow::{load_from_file, validate_workflow, ValidationIssue};

use super::dispatcher::{Command, CommandResult};

/// The validate command implementation.
pub struct ValidateCommand {
    args: ValidateArgs,
}

impl ValidateCommand {
    pub fn new(args: ValidateArgs) -> Self {
        Self { args }
    }

    fn format_issue(issue: &ValidationIssue) -> String {
        match &issue.step {
            Some(step) => format!("[{}] {}: {}", issue.rule, step, issue.message),
            None => format!("[{}] {}", issue.rule, issue.message),
        }
    }
}

impl Command for ValidateCommand {
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

        let issues = validate_workflow(&workflow);
        if issues.is_empty() {
            let label = if workflow.len() == 1 { "step" } else { "steps" };
            ui.success(&format!(
                "Workflow '{}' is valid ({} {})",
                workflow.name(),
                workflow.len(),
                label
            ));
            return Ok(CommandResult::success());
        }

        for issue in &issues {
            ui.error(&Self::format_issue(issue));
        }
        ui.message(&format!("{} issue(s) found", issues.len()));
        Ok(CommandResult::failure(1))
    }
}
