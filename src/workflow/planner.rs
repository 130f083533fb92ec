//! Workflow planning from a natural-language request.

use tracing::{debug, info};

use crate::error::{CodeflowError, Result};
use crate::generation::{prompts, TextGenerator};
use crate::steps::extract::extract_json_block;

use super::codec::from_json;
use super::model::Workflow;

/// Ask the generation service to design a workflow for `request`.
///
/// # Errors
///
/// Returns `Generation` if the service fails and `WorkflowDecode` if the
/// response contains no decodable workflow document.
pub fn plan_workflow(request: &str, generator: &dyn TextGenerator) -> Result<Workflow> {
    let prompt = prompts::plan_prompt(request);
    debug!("Planning prompt: {}", prompt);

    let response = generator.generate(&prompt)?;
    let json = extract_json_block(&response).ok_or_else(|| CodeflowError::WorkflowDecode {
        message: "no JSON workflow found in the generation response".to_string(),
    })?;

    let workflow = from_json(json)?;
    info!(
        "Planned workflow '{}' with {} steps",
        workflow.name(),
        workflow.len()
    );
    Ok(workflow)
}
