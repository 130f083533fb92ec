//! Console confirmation gate for interactive runs.
//!
//! After each step the user sees the result and picks accept, reject or
//! (when the result carries code) edit.

use crate::error::Result;
use crate::ui::{Prompt, PromptOption, PromptType, UserInterface};

use super::engine::{Decision, PendingConfirmation};

/// Line that ends a multi-line edit.
pub const EDIT_TERMINATOR: &str = "END";

/// Show a paused step's result and ask what to do with it.
///
/// Re-asks on an unrecognised answer or an empty edit.
pub fn confirm_result(
    ui: &mut dyn UserInterface,
    pending: &PendingConfirmation,
) -> Result<Decision> {
    let step_id = pending.step_id();
    let record = pending.record();

    ui.show_header(&format!("Result of step '{}'", step_id));
    if let Some(code) = record.code() {
        ui.show_code(code);
    } else if let Some(content) = record.content() {
        ui.message("Content:");
        ui.message(content);
    }
    if let Some(error) = record.error() {
        ui.error(error);
    }

    let editable = record.code().is_some();
    let mut options = vec![
        PromptOption {
            label: "Accept (y)".to_string(),
            value: "y".to_string(),
        },
        PromptOption {
            label: "Reject and stop (n)".to_string(),
            value: "n".to_string(),
        },
    ];
    if editable {
        options.push(PromptOption {
            label: "Edit the code (e)".to_string(),
            value: "e".to_string(),
        });
    }

    let prompt = Prompt {
        key: format!("confirm_{}", step_id),
        question: "Accept this result?".to_string(),
        prompt_type: PromptType::Select { options },
        default: Some("y".to_string()),
    };

    loop {
        let answer = ui.prompt(&prompt)?.as_string();
        match answer.trim().to_lowercase().as_str() {
            "y" | "yes" => return Ok(Decision::Accept),
            "n" | "no" => return Ok(Decision::Reject),
            "e" | "edit" if editable => {
                ui.message(&format!(
                    "Enter the new code, finishing with a line containing only {}:",
                    EDIT_TERMINATOR
                ));
                let code = ui.read_block(&format!("edit_{}", step_id), EDIT_TERMINATOR)?;
                if code.is_empty() {
                    ui.warning("Empty edit ignored");
                    continue;
                }
                return Ok(Decision::Edit(code));
            }
            _ => {
                let choices = if editable { "'y', 'n' or 'e'" } else { "'y' or 'n'" };
                ui.warning(&format!("Please answer {}", choices));
            }
        }
    }
}
