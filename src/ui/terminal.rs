//! Interactive terminal UI.

use console::Term;
use std::io::Write;

use crate::error::Result;

use super::theme::{CodeflowTheme, Tone};
use super::{
    prompt_user, read_block_from, NonInteractiveUI, OutputMode, ProgressSpinner, Prompt,
    PromptResult, SpinnerHandle, UserInterface,
};

/// Styled output on stdout, dialoguer prompts, indicatif spinners.
pub struct TerminalUI {
    term: Term,
    theme: CodeflowTheme,
    mode: OutputMode,
}

impl TerminalUI {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            term: Term::stdout(),
            theme: CodeflowTheme::detect(),
            mode,
        }
    }

    fn line(&mut self, text: &str) {
        // A closed stdout is not worth failing a run over.
        let _ = writeln!(self.term, "{}", text);
    }

    fn progress_line(&mut self, text: &str) {
        if self.mode.shows_progress() {
            self.line(text);
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.progress_line(msg);
    }

    fn success(&mut self, msg: &str) {
        let text = self.theme.status(Tone::Success, msg);
        self.progress_line(&text);
    }

    fn warning(&mut self, msg: &str) {
        let text = self.theme.status(Tone::Warning, msg);
        self.line(&text);
    }

    fn error(&mut self, msg: &str) {
        let text = self.theme.status(Tone::Error, msg);
        self.line(&text);
    }

    fn show_header(&mut self, title: &str) {
        let text = format!("\n{}\n", self.theme.header(title));
        self.progress_line(&text);
    }

    fn show_code(&mut self, code: &str) {
        let text = self.theme.code_frame(code);
        self.line(&text);
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        prompt_user(prompt, &self.term)
    }

    fn read_block(&mut self, _key: &str, terminator: &str) -> Result<String> {
        read_block_from(std::io::stdin().lock(), terminator)
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_progress() {
            Box::new(ProgressSpinner::new(message, self.theme.clone()))
        } else {
            Box::new(ProgressSpinner::hidden())
        }
    }
}

/// The terminal UI when `interactive` and stdout is a terminal, else the
/// non-interactive UI.
pub fn create_ui(interactive: bool, mode: OutputMode) -> Box<dyn UserInterface> {
    if interactive && Term::stdout().is_term() {
        Box::new(TerminalUI::new(mode))
    } else {
        Box::new(NonInteractiveUI::new(mode))
    }
}
