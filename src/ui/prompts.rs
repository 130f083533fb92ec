//! Interactive prompts.

use console::Term;
use dialoguer::{Confirm, Input, Select};
use std::io::BufRead;

use crate::error::{CodeflowError, Result};

use super::{Prompt, PromptOption, PromptResult, PromptType};

fn io_error(e: dialoguer::Error) -> CodeflowError {
    CodeflowError::Io(e.into())
}

/// Ask `prompt` on `term` with the matching dialoguer widget.
pub fn prompt_user(prompt: &Prompt, term: &Term) -> Result<PromptResult> {
    let default = prompt.default.as_deref();
    match &prompt.prompt_type {
        PromptType::Confirm => {
            let yes = default.map_or(true, |d| {
                matches!(d.to_lowercase().as_str(), "true" | "y" | "yes")
            });
            Confirm::new()
                .with_prompt(&prompt.question)
                .default(yes)
                .interact_on(term)
                .map(PromptResult::Bool)
                .map_err(io_error)
        }
        PromptType::Input => {
            let mut input = Input::<String>::new()
                .with_prompt(prompt.question.trim_end())
                .allow_empty(true);
            if let Some(d) = default {
                input = input.default(d.to_string());
            }
            input
                .interact_on(term)
                .map(PromptResult::String)
                .map_err(io_error)
        }
        PromptType::Select { options } => select(&prompt.question, options, default, term),
    }
}

fn select(
    question: &str,
    options: &[PromptOption],
    default: Option<&str>,
    term: &Term,
) -> Result<PromptResult> {
    let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
    let start = default
        .and_then(|d| options.iter().position(|o| o.value == d))
        .unwrap_or(0);

    let picked = Select::new()
        .with_prompt(question)
        .items(&labels)
        .default(start)
        .interact_on(term)
        .map_err(io_error)?;

    options
        .get(picked)
        .map(|o| PromptResult::String(o.value.clone()))
        .ok_or_else(|| CodeflowError::Other(anyhow::anyhow!("no option at index {}", picked)))
}

/// Read lines from `reader` until one equals `terminator` or input ends.
pub fn read_block_from<R: BufRead>(reader: R, terminator: &str) -> Result<String> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim_end_matches('\r') == terminator {
            break;
        }
        lines.push(line);
    }
    Ok(lines.join("\n"))
}
