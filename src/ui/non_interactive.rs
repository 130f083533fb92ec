//! UI for CI and piped runs, where nobody can answer a question.

use std::collections::HashMap;

use crate::error::{CodeflowError, Result};

use super::theme::{CodeflowTheme, Tone};
use super::{OutputMode, Prompt, PromptResult, PromptType, SpinnerHandle, UserInterface};

/// Prefix of environment variables that answer prompts by key.
pub const PROMPT_ENV_PREFIX: &str = "CODEFLOW_PROMPT_";

/// Plain-text UI whose prompts are answered ahead of time.
///
/// An answer comes from `CODEFLOW_PROMPT_<KEY>` (key upper-cased), then
/// from the prompt's default. A prompt with neither fails the step.
/// Progress goes to stdout, warnings and errors to stderr.
pub struct NonInteractiveUI {
    mode: OutputMode,
    answers: HashMap<String, String>,
    theme: CodeflowTheme,
}

impl NonInteractiveUI {
    /// Answers are read from the process environment.
    pub fn new(mode: OutputMode) -> Self {
        let answers = std::env::vars()
            .filter(|(k, _)| k.starts_with(PROMPT_ENV_PREFIX))
            .collect();
        Self::with_answers(mode, answers)
    }

    /// Answers keyed by full variable name, e.g. `CODEFLOW_PROMPT_ASK`.
    pub fn with_answers(mode: OutputMode, answers: HashMap<String, String>) -> Self {
        Self {
            mode,
            answers,
            theme: CodeflowTheme::plain(),
        }
    }

    fn variable(key: &str) -> String {
        format!("{}{}", PROMPT_ENV_PREFIX, key.to_uppercase())
    }

    fn answer(&self, key: &str) -> Option<&str> {
        self.answers.get(&Self::variable(key)).map(String::as_str)
    }

    fn unanswered(key: &str, message: String) -> CodeflowError {
        CodeflowError::StepExecutionError {
            step: key.to_string(),
            message,
        }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_progress() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_progress() {
            println!("{}", self.theme.status(Tone::Success, msg));
        }
    }

    fn warning(&mut self, msg: &str) {
        eprintln!("{}", self.theme.status(Tone::Warning, msg));
    }

    fn error(&mut self, msg: &str) {
        eprintln!("{}", self.theme.status(Tone::Error, msg));
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_progress() {
            println!("{}", self.theme.header(title));
        }
    }

    fn show_code(&mut self, code: &str) {
        println!("{}", self.theme.code_frame(code));
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        let value = self
            .answer(&prompt.key)
            .or(prompt.default.as_deref())
            .ok_or_else(|| {
                Self::unanswered(
                    &prompt.key,
                    format!(
                        "no answer for '{}' in non-interactive mode (set {} or give a default)",
                        prompt.question.trim(),
                        Self::variable(&prompt.key)
                    ),
                )
            })?;

        Ok(match prompt.prompt_type {
            PromptType::Confirm => PromptResult::Bool(matches!(
                value.to_lowercase().as_str(),
                "true" | "yes" | "y" | "1"
            )),
            _ => PromptResult::String(value.to_string()),
        })
    }

    fn read_block(&mut self, key: &str, _terminator: &str) -> Result<String> {
        self.answer(key).map(String::from).ok_or_else(|| {
            Self::unanswered(
                key,
                format!("no text for '{}' in non-interactive mode", Self::variable(key)),
            )
        })
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_progress() {
            println!("  {}", message);
        }
        Box::new(LineSpinner {
            progress: self.mode.shows_progress(),
            theme: self.theme.clone(),
        })
    }
}

/// Prints one line when the operation ends.
struct LineSpinner {
    progress: bool,
    theme: CodeflowTheme,
}

impl SpinnerHandle for LineSpinner {
    fn finish_success(&mut self, msg: &str) {
        if self.progress {
            println!("  {}", self.theme.status(Tone::Success, msg));
        }
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("  {}", self.theme.status(Tone::Error, msg));
    }
}
