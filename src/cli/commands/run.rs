//! Run command implementation.
//!
//! The `codeflow run` command executes a workflow file.

use chrono::Utc;
use tracing::{error, info};

use crate::cli::args::RunArgs;
use crate::config::Settings;
use crate::error::{CodeflowError, Result};
use crate::generation::TextGenerator;
use crate::runner::{ResultStore, RunReport, RunSnapshot, WorkflowEngine};
use crate::ui::UserInterface;
use crate::workflow::{load_from_file, Workflow};

use super::context::CommandContext;
use super::dispatcher::{Command, CommandResult};

/// The run command implementation.
pub struct RunCommand {
    context: CommandContext,
    args: RunArgs,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(context: CommandContext, args: RunArgs) -> Self {
        Self { context, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &RunArgs {
        &self.args
    }

    fn load_workflow(&self, ui: &mut dyn UserInterface) -> Result<Option<Workflow>> {
        match load_from_file(&self.args.file) {
            Ok(w) => Ok(Some(w)),
            Err(e @ CodeflowError::WorkflowNotFound { .. }) => {
                ui.error(&e.to_string());
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn interactive(&self, settings: &Settings) -> bool {
        !self.args.non_interactive && (self.args.interactive || settings.interactive)
    }

    /// Run the workflow file against `generator`.
    pub fn execute_with(
        &self,
        settings: &Settings,
        generator: &dyn TextGenerator,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        let Some(workflow) = self.load_workflow(ui)? else {
            return Ok(CommandResult::failure(2));
        };

        let label = if workflow.len() == 1 { "step" } else { "steps" };
        ui.show_header(&format!(
            "Running {} ({} {})",
            workflow.name(),
            workflow.len(),
            label
        ));

        let name = workflow.name().to_string();
        let mut engine = WorkflowEngine::new(workflow, generator)
            .with_language(settings.generation.language.clone());
        engine.set_interactive_mode(self.interactive(settings));

        let started_at = Utc::now();
        let outcome = engine.execute(self.args.from.as_deref(), ui);

        let report = match outcome {
            Ok(report) => report,
            Err(e) if e.is_configuration() => {
                error!("Workflow '{}' stopped: {}", name, e);
                ui.error(&e.to_string());
                let report = RunReport {
                    visited: engine.visited().to_vec(),
                    halted_at: e.step().map(String::from),
                };
                show_summary(&report, engine.results(), ui);
                self.write_snapshot(&name, started_at, &report, engine.results(), ui)?;
                return Ok(CommandResult::failure(1));
            }
            Err(e) => return Err(e),
        };

        show_summary(&report, engine.results(), ui);
        self.write_snapshot(&name, started_at, &report, engine.results(), ui)?;

        match &report.halted_at {
            None => {
                info!("Workflow '{}' completed", name);
                ui.success(&format!("Workflow '{}' complete", name));
                Ok(CommandResult::success())
            }
            Some(step) => {
                ui.warning(&format!("Workflow '{}' halted at step '{}'", name, step));
                Ok(CommandResult::failure(1))
            }
        }
    }

    fn write_snapshot(
        &self,
        name: &str,
        started_at: chrono::DateTime<Utc>,
        report: &RunReport,
        results: &ResultStore,
        ui: &mut dyn UserInterface,
    ) -> Result<()> {
        if let Some(path) = &self.args.results_out {
            RunSnapshot::new(name, started_at, report, results).save(path)?;
            ui.message(&format!("Results written to {}", path.display()));
        }
        Ok(())
    }
}

/// Print one line per visited step, in first-visit order.
fn show_summary(report: &RunReport, results: &ResultStore, ui: &mut dyn UserInterface) {
    let mut seen: Vec<&str> = Vec::new();
    for id in &report.visited {
        if seen.contains(&id.as_str()) {
            continue;
        }
        seen.push(id);

        let visits = report.visited.iter().filter(|v| *v == id).count();
        let suffix = if visits > 1 {
            format!(" (x{})", visits)
        } else {
            String::new()
        };

        match results.get(id) {
            None => ui.warning(&format!("{} skipped{}", id, suffix)),
            Some(record) => match record.error() {
                Some(err) => ui.error(&format!("{}{}: {}", id, suffix, err)),
                None => {
                    ui.success(&format!("{}{}", id, suffix));
                    if ui.output_mode().shows_code() {
                        if let Some(code) = record.code() {
                            ui.show_code(code);
                        }
                    }
                }
            },
        }
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let settings = match self.context.settings() {
            Ok(s) => s,
            Err(
                e @ (CodeflowError::ConfigNotFound { .. } | CodeflowError::ConfigParseError { .. }),
            ) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(1));
            }
            Err(e) => return Err(e),
        };
        let generator = self.context.generator(&settings)?;
        self.execute_with(&settings, &generator, ui)
    }
}
