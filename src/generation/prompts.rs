//! Prompt templates sent to the generation service.

use crate::workflow::StepType;

/// Prompt for `code_generation` steps.
pub fn generation_prompt(task: &str, language: &str) -> String {
    format!(
        "Write {language} code that implements the following task.\n\
         Task: {task}\n\n\
         Return the complete code in a single ```{language} fenced block."
    )
}

/// Prompt for `code_editing` steps.
pub fn edit_prompt(instruction: &str, code: &str, language: &str) -> String {
    format!(
        "Edit the following {language} code.\n\
         Instruction: {instruction}\n\n\
         Code:\n```{language}\n{code}\n```\n\n\
         Return the complete edited code in a single ```{language} fenced block."
    )
}

/// Prompt for `code_review` steps.
pub fn review_prompt(code: &str, language: &str) -> String {
    format!(
        "Review the following {language} code. Point out bugs, unclear naming, \
         missing error handling and possible improvements.\n\n\
         Code:\n```{language}\n{code}\n```"
    )
}

/// Prompt for `code_refactoring` steps.
pub fn refactor_prompt(code: &str, language: &str) -> String {
    format!(
        "Refactor the following {language} code for readability and maintainability \
         without changing its behavior.\n\n\
         Code:\n```{language}\n{code}\n```\n\n\
         Return the complete refactored code in a single ```{language} fenced block."
    )
}

/// Prompt for `test_generation` steps.
pub fn test_prompt(code: &str, language: &str) -> String {
    format!(
        "Write unit tests for the following {language} code. Cover normal cases \
         and edge cases.\n\n\
         Code:\n```{language}\n{code}\n```\n\n\
         Return the tests in a single ```{language} fenced block."
    )
}

/// Prompt for `documentation` steps.
pub fn documentation_prompt(code: &str, language: &str) -> String {
    format!(
        "Add documentation comments to the following {language} code. Describe \
         each function's purpose, parameters and return value.\n\n\
         Code:\n```{language}\n{code}\n```\n\n\
         Return the complete documented code in a single ```{language} fenced block."
    )
}

/// Prompt asking the service to design a workflow document.
pub fn plan_prompt(request: &str) -> String {
    let step_types = StepType::ALL
        .iter()
        .map(|t| format!("- {}", t.as_str()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Design a workflow for the following task:
{request}

Answer with a single JSON document in a ```json fenced block, in this format:
{{
  "name": "workflow name",
  "description": "what the workflow does",
  "start_step": "id of the first step",
  "steps": {{
    "step_id": {{
      "step_type": "one of the step types below",
      "description": "what the step does",
      "arguments": {{}},
      "condition": null,
      "next_on_success": "id of the next step or null",
      "next_on_failure": "id of the step to run on failure or null"
    }}
  }}
}}

Available step types:
{step_types}

Arguments by step type:
- code_generation: task, language
- code_editing: filename or previous_step, instruction, save
- code_review, code_refactoring, test_generation, documentation: filename or previous_step
- user_input: prompt
- file_operation: operation (read or write), filename, content or previous_step
- conditional: condition
- loop: condition, body_step

Conditions may reference earlier results as {{step_id.field}}."#
    )
}
