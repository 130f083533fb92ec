//! Plan command implementation.
//!
//! The `codeflow plan` command asks the generation service to draft a
//! workflow and saves it.

use crate::cli::args::PlanArgs;
use crate::error::{CodeflowError, Result};
use crate::generation::TextGenerator;
use crate::ui::UserInterface;
use crate::workflow::{plan_workflow, save_to_file, validate_workflow};

use super::context::CommandContext;
use super::dispatcher::{Command, CommandResult};

/// The plan command implementation.
pub struct PlanCommand {
    context: CommandContext,
    args: PlanArgs,
}

impl PlanCommand {
    pub fn new(context: CommandContext, args: PlanArgs) -> Self {
        Self { context, args }
    }

    /// Draft and save a workflow using `generator`.
    pub fn execute_with(
        &self,
        generator: &dyn TextGenerator,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        let mut spinner = ui.start_spinner("Planning workflow...");
        let workflow = match plan_workflow(&self.args.request, generator) {
            Ok(w) => {
                spinner.finish_success("Workflow planned");
                w
            }
            Err(e @ (CodeflowError::Generation(_) | CodeflowError::WorkflowDecode { .. })) => {
                spinner.finish_error("Planning failed");
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(1));
            }
            Err(e) => {
                spinner.finish_error("Planning failed");
                return Err(e);
            }
        };

        for issue in validate_workflow(&workflow) {
            ui.warning(&issue.message);
        }

        save_to_file(&workflow, &self.args.output)?;
        ui.success(&format!(
            "Saved workflow '{}' ({} steps) to {}",
            workflow.name(),
            workflow.len(),
            self.args.output.display()
        ));
        Ok(CommandResult::success())
    }
}

impl Command for PlanCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let settings = match self.context.settings() {
            Ok(s) => s,
            Err(e) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(1));
            }
        };
        let generator = self.context.generator(&settings)?;
        self.execute_with(&generator, ui)
    }
}
