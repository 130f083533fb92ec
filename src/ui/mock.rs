//! Scripted UI for tests.
//!
//! ```
//! use codeflow::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.queue_prompt_responses("ask", vec!["again", "done"]);
//! ui.warning("step 'review' skipped");
//! assert!(ui.has_warning("skipped"));
//! ```

use std::collections::{HashMap, VecDeque};

use crate::error::Result;

use super::{OutputMode, Prompt, PromptResult, PromptType, SpinnerHandle, UserInterface};

/// Records everything shown and answers prompts from scripted responses.
///
/// An answer for a key comes from its queue first (loops ask the same key
/// repeatedly), then from its fixed response, then from the prompt's
/// default. Unanswered confirmations are `false`; other prompts get `""`.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    headers: Vec<String>,
    code_blocks: Vec<String>,
    spinners: Vec<String>,
    asked: Vec<String>,
    responses: HashMap<String, String>,
    queued: HashMap<String, VecDeque<String>>,
    blocks: HashMap<String, VecDeque<String>>,
}

impl MockUI {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Answer every prompt with `key` by `response`.
    pub fn set_prompt_response(&mut self, key: &str, response: &str) {
        self.responses.insert(key.to_string(), response.to_string());
    }

    /// Answer the next prompts with `key` by `responses`, in order.
    pub fn queue_prompt_responses(&mut self, key: &str, responses: Vec<&str>) {
        self.queued
            .insert(key.to_string(), responses.into_iter().map(String::from).collect());
    }

    /// Queue a block for the next `read_block` with `key`.
    pub fn set_block_response(&mut self, key: &str, block: &str) {
        self.blocks
            .entry(key.to_string())
            .or_default()
            .push_back(block.to_string());
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn code_blocks(&self) -> &[String] {
        &self.code_blocks
    }

    /// Messages of every spinner started.
    pub fn spinners(&self) -> &[String] {
        &self.spinners
    }

    /// Keys of every prompt asked and block read, in order.
    pub fn prompts_shown(&self) -> &[String] {
        &self.asked
    }

    pub fn has_message(&self, text: &str) -> bool {
        contains(&self.messages, text)
    }

    pub fn has_success(&self, text: &str) -> bool {
        contains(&self.successes, text)
    }

    pub fn has_warning(&self, text: &str) -> bool {
        contains(&self.warnings, text)
    }

    pub fn has_error(&self, text: &str) -> bool {
        contains(&self.errors, text)
    }

    fn scripted_answer(&mut self, prompt: &Prompt) -> Option<String> {
        self.queued
            .get_mut(&prompt.key)
            .and_then(VecDeque::pop_front)
            .or_else(|| self.responses.get(&prompt.key).cloned())
            .or_else(|| prompt.default.clone())
    }
}

fn contains(lines: &[String], text: &str) -> bool {
    lines.iter().any(|line| line.contains(text))
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn show_code(&mut self, code: &str) {
        self.code_blocks.push(code.to_string());
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        self.asked.push(prompt.key.clone());
        let answer = self.scripted_answer(prompt);

        Ok(match prompt.prompt_type {
            PromptType::Confirm => PromptResult::Bool(
                answer.is_some_and(|a| matches!(a.as_str(), "true" | "yes" | "y" | "1")),
            ),
            _ => PromptResult::String(answer.unwrap_or_default()),
        })
    }

    fn read_block(&mut self, key: &str, _terminator: &str) -> Result<String> {
        self.asked.push(key.to_string());
        Ok(self
            .blocks
            .get_mut(key)
            .and_then(VecDeque::pop_front)
            .unwrap_or_default())
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        self.spinners.push(message.to_string());
        Box::new(SilentSpinner)
    }
}

struct SilentSpinner;

impl SpinnerHandle for SilentSpinner {
    fn finish_success(&mut self, _msg: &str) {}
    fn finish_error(&mut self, _msg: &str) {}
}
