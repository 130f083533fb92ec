//! Step execution.
//!
//! Dispatches a [`StepDefinition`] to the logic for its [`StepAction`] and
//! returns a typed [`StepOutput`]. This is the only place that talks to the
//! generation service or touches files on behalf of a workflow.

use tracing::{debug, error, info, warn};

use crate::condition;
use crate::error::{CodeflowError, Result};
use crate::generation::{prompts, TextGenerator};
use crate::runner::ResultStore;
use crate::ui::{Prompt, PromptType, UserInterface};
use crate::workflow::{
    ConditionalArgs, EditArgs, FileOperationArgs, GenerationArgs, LoopArgs, SourceArgs,
    StepAction, StepDefinition, UserInputArgs,
};

use super::extract::extract_code_block;
use super::output::StepOutput;
use super::source::resolve_source;

/// Language used for prompts and fence matching when neither the step nor
/// the settings name one.
pub const DEFAULT_LANGUAGE: &str = "python";

/// Everything a step may read or interact with while it runs.
pub struct StepContext<'a> {
    /// Results of the steps executed so far.
    pub results: &'a ResultStore,
    /// Console used for `user_input` steps and progress spinners.
    pub ui: &'a mut dyn UserInterface,
}

/// Executes individual steps.
pub struct StepExecutor<'a> {
    generator: &'a dyn TextGenerator,
    language: String,
}

/// The kinds of code transformation that share the "resolve source, prompt,
/// extract" shape.
#[derive(Clone, Copy)]
enum Transform {
    Review,
    Refactor,
    Tests,
    Documentation,
}

impl<'a> StepExecutor<'a> {
    pub fn new(generator: &'a dyn TextGenerator) -> Self {
        Self {
            generator,
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    /// Set the default language for code-producing steps.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Execute one step.
    ///
    /// Recoverable problems (missing files, missing prior results, broken
    /// conditions) come back as an `Ok` output carrying an error. `Err` is
    /// returned for generation failures and failed writes; the engine
    /// records those against the step as well.
    pub fn execute(
        &self,
        step_id: &str,
        step: &StepDefinition,
        ctx: &mut StepContext<'_>,
    ) -> Result<StepOutput> {
        info!("Executing step '{}' ({})", step_id, step.step_type());

        match step.action() {
            StepAction::UserInput(args) => self.user_input(step_id, args, ctx),
            StepAction::CodeGeneration(args) => self.code_generation(step_id, step, args, ctx),
            StepAction::CodeEditing(args) => self.code_editing(step_id, step, args, ctx),
            StepAction::FileOperation(args) => Ok(self.file_operation(args, ctx)),
            StepAction::CodeReview(args) => {
                self.transform(step_id, step, args, Transform::Review, ctx)
            }
            StepAction::CodeRefactoring(args) => {
                self.transform(step_id, step, args, Transform::Refactor, ctx)
            }
            StepAction::TestGeneration(args) => {
                self.transform(step_id, step, args, Transform::Tests, ctx)
            }
            StepAction::Documentation(args) => {
                self.transform(step_id, step, args, Transform::Documentation, ctx)
            }
            StepAction::Conditional(args) => Ok(self.conditional(step_id, step, args, ctx)),
            StepAction::Loop(args) => Ok(self.repeat(step_id, step, args, ctx)),
        }
    }

    fn language_for<'s>(&'s self, requested: &'s Option<String>) -> &'s str {
        requested.as_deref().unwrap_or(&self.language)
    }

    /// Send a prompt with a spinner running.
    fn generate(
        &self,
        step_id: &str,
        step: &StepDefinition,
        prompt: &str,
        ui: &mut dyn UserInterface,
    ) -> Result<String> {
        debug!("Prompt for '{}':\n{}", step_id, prompt);

        let label = if step.description().is_empty() {
            step_id.to_string()
        } else {
            format!("{} - {}", step_id, step.description())
        };
        let mut spinner = ui.start_spinner(&label);

        match self.generator.generate(prompt) {
            Ok(response) => {
                spinner.finish_success(&label);
                Ok(response)
            }
            Err(e) => {
                spinner.finish_error(&format!("{}: {}", label, e));
                Err(e.into())
            }
        }
    }

    fn user_input(
        &self,
        step_id: &str,
        args: &UserInputArgs,
        ctx: &mut StepContext<'_>,
    ) -> Result<StepOutput> {
        let prompt = Prompt {
            key: step_id.to_string(),
            question: args.prompt.clone(),
            prompt_type: PromptType::Input,
            default: None,
        };
        let input = ctx.ui.prompt(&prompt)?.as_string();
        Ok(StepOutput::Input { input })
    }

    fn code_generation(
        &self,
        step_id: &str,
        step: &StepDefinition,
        args: &GenerationArgs,
        ctx: &mut StepContext<'_>,
    ) -> Result<StepOutput> {
        let language = self.language_for(&args.language);
        let prompt = prompts::generation_prompt(&args.task, language);
        let response = self.generate(step_id, step, &prompt, ctx.ui)?;

        Ok(StepOutput::Generated {
            code: extract_code_block(&response, language),
            full_response: response,
        })
    }

    fn code_editing(
        &self,
        step_id: &str,
        step: &StepDefinition,
        args: &EditArgs,
        ctx: &mut StepContext<'_>,
    ) -> Result<StepOutput> {
        let original_code = match resolve_source(&args.source(), ctx.results) {
            Ok(code) => code,
            Err(e) => {
                warn!("Step '{}': {}", step_id, e);
                return Ok(StepOutput::failed(e.to_string()));
            }
        };

        let language = self.language_for(&args.language);
        let prompt = prompts::edit_prompt(&args.instruction, &original_code, language);
        let response = self.generate(step_id, step, &prompt, ctx.ui)?;
        let code = extract_code_block(&response, language);

        if args.save {
            if let Some(path) = &args.filename {
                std::fs::write(path, &code).map_err(|e| CodeflowError::StepExecutionError {
                    step: step_id.to_string(),
                    message: format!("failed to save {}: {}", path, e),
                })?;
                info!("Saved edited code to {}", path);
            }
        }

        Ok(StepOutput::Edited {
            code,
            original_code,
            full_response: response,
        })
    }

    fn file_operation(&self, args: &FileOperationArgs, ctx: &mut StepContext<'_>) -> StepOutput {
        let Some(filename) = args.filename.as_deref() else {
            return StepOutput::failed("No filename given");
        };

        match args.operation.as_deref() {
            Some("read") => match std::fs::read_to_string(filename) {
                Ok(content) => StepOutput::FileRead { content },
                Err(e) => StepOutput::failed(format!("Failed to read {}: {}", filename, e)),
            },
            Some("write") => {
                let content = args
                    .content
                    .as_deref()
                    .filter(|c| !c.is_empty())
                    .map(str::to_string)
                    .or_else(|| {
                        args.previous_step
                            .as_deref()
                            .and_then(|step| ctx.results.get(step))
                            .and_then(|record| record.code())
                            .map(str::to_string)
                    });

                let Some(content) = content else {
                    return StepOutput::failed(format!(
                        "Nothing to write to {}: give content or a previous_step with code",
                        filename
                    ));
                };

                match std::fs::write(filename, content) {
                    Ok(()) => StepOutput::FileWritten {
                        filename: filename.to_string(),
                        success: true,
                    },
                    Err(e) => StepOutput::failed(format!("Failed to write {}: {}", filename, e)),
                }
            }
            Some(other) => StepOutput::failed(format!("Unsupported file operation: {}", other)),
            None => StepOutput::failed("No file operation given"),
        }
    }

    fn transform(
        &self,
        step_id: &str,
        step: &StepDefinition,
        args: &SourceArgs,
        kind: Transform,
        ctx: &mut StepContext<'_>,
    ) -> Result<StepOutput> {
        let code = match resolve_source(args, ctx.results) {
            Ok(code) => code,
            Err(e) => {
                warn!("Step '{}': {}", step_id, e);
                return Ok(StepOutput::failed(e.to_string()));
            }
        };

        let language = self.language_for(&args.language);
        let prompt = match kind {
            Transform::Review => prompts::review_prompt(&code, language),
            Transform::Refactor => prompts::refactor_prompt(&code, language),
            Transform::Tests => prompts::test_prompt(&code, language),
            Transform::Documentation => prompts::documentation_prompt(&code, language),
        };
        let response = self.generate(step_id, step, &prompt, ctx.ui)?;

        Ok(match kind {
            Transform::Review => StepOutput::Review { review: response },
            Transform::Refactor => StepOutput::Edited {
                code: extract_code_block(&response, language),
                original_code: code,
                full_response: response,
            },
            Transform::Tests | Transform::Documentation => StepOutput::Generated {
                code: extract_code_block(&response, language),
                full_response: response,
            },
        })
    }

    fn conditional(
        &self,
        step_id: &str,
        step: &StepDefinition,
        args: &ConditionalArgs,
        ctx: &mut StepContext<'_>,
    ) -> StepOutput {
        match condition::evaluate(&args.condition, ctx.results) {
            Ok(result) => {
                let next = if result {
                    step.next_on_success()
                } else {
                    step.next_on_failure()
                };
                debug!("Condition '{}' in '{}' is {}", args.condition, step_id, result);
                StepOutput::Branch {
                    condition: result,
                    next_step: next.map(str::to_string),
                    error: None,
                }
            }
            Err(e) => {
                error!("Condition error in step '{}': {}", step_id, e);
                StepOutput::Branch {
                    condition: false,
                    next_step: step.next_on_failure().map(str::to_string),
                    error: Some(format!("Condition error: {}", e)),
                }
            }
        }
    }

    fn repeat(
        &self,
        step_id: &str,
        step: &StepDefinition,
        args: &LoopArgs,
        ctx: &mut StepContext<'_>,
    ) -> StepOutput {
        match condition::evaluate(&args.condition, ctx.results) {
            Ok(true) => StepOutput::Loop {
                looping: true,
                next_step: Some(args.body_step.clone()),
                error: None,
            },
            Ok(false) => StepOutput::Loop {
                looping: false,
                next_step: step.next_on_success().map(str::to_string),
                error: None,
            },
            Err(e) => {
                error!("Loop condition error in step '{}': {}", step_id, e);
                StepOutput::Loop {
                    looping: false,
                    next_step: step.next_on_failure().map(str::to_string),
                    error: Some(format!("Condition error: {}", e)),
                }
            }
        }
    }
}
