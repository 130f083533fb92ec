//! Everything a run shows to, or asks of, the person at the keyboard.
//!
//! Engine and commands talk to a `&mut dyn UserInterface`. [`create_ui`]
//! picks [`TerminalUI`] when stdout is a terminal and
//! [`NonInteractiveUI`] otherwise; tests use [`MockUI`].
//!
//! ```
//! use codeflow::ui::{create_ui, OutputMode};
//!
//! let mut ui = create_ui(false, OutputMode::Quiet);
//! ui.show_header("Running demo");
//! ui.warning("step 'review' skipped");
//! ```

pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod prompts;
pub mod spinner;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use non_interactive::NonInteractiveUI;
pub use output::OutputMode;
pub use prompts::{prompt_user, read_block_from};
pub use spinner::ProgressSpinner;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{CodeflowTheme, Tone};

use crate::error::Result;

pub trait UserInterface {
    fn output_mode(&self) -> OutputMode;

    fn message(&mut self, msg: &str);
    fn success(&mut self, msg: &str);
    fn warning(&mut self, msg: &str);
    fn error(&mut self, msg: &str);

    fn show_header(&mut self, title: &str);

    /// Display code produced by a step.
    fn show_code(&mut self, code: &str);

    /// Ask one question.
    ///
    /// `prompt.key` identifies the question to scripted answer sources
    /// (`CODEFLOW_PROMPT_<KEY>`, [`MockUI`] responses).
    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult>;

    /// Read lines until one equals `terminator`, which is dropped.
    fn read_block(&mut self, key: &str, terminator: &str) -> Result<String>;

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;
}

/// Handle returned by [`UserInterface::start_spinner`].
pub trait SpinnerHandle {
    fn finish_success(&mut self, msg: &str);
    fn finish_error(&mut self, msg: &str);
}

#[derive(Debug, Clone)]
pub struct Prompt {
    pub key: String,
    pub question: String,
    pub prompt_type: PromptType,
    /// Answer used when the user enters nothing, or when nobody can be asked.
    pub default: Option<String>,
}

#[derive(Debug, Clone)]
pub enum PromptType {
    Confirm,
    Input,
    /// Pick one of `options`; the answer is the option's `value`.
    Select { options: Vec<PromptOption> },
}

#[derive(Debug, Clone)]
pub struct PromptOption {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PromptResult {
    Bool(bool),
    String(String),
}

impl PromptResult {
    /// The answer as text; confirmations become `"true"` or `"false"`.
    pub fn as_string(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::String(s) => s.clone(),
        }
    }
}
