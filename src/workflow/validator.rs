//! Static workflow checks.
//!
//! These checks are advisory. The engine still reports dangling
//! successors when traversal reaches them; validation just finds them
//! before anything runs.

use crate::condition;

use super::definition::StepAction;
use super::model::Workflow;

/// A problem found in a workflow definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Rule identifier
    pub rule: &'static str,
    /// Human-readable message
    pub message: String,
    /// Step identifier if the issue is step-specific
    pub step: Option<String>,
}

impl ValidationIssue {
    fn for_step(rule: &'static str, step: &str, message: String) -> Self {
        Self {
            rule,
            message,
            step: Some(step.to_string()),
        }
    }
}

/// Validate a workflow and return every issue found.
pub fn validate_workflow(workflow: &Workflow) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    match workflow.start_step() {
        None => issues.push(ValidationIssue {
            rule: "missing-start-step",
            message: "Workflow has no start_step".to_string(),
            step: None,
        }),
        Some(start) if !workflow.contains(start) => issues.push(ValidationIssue {
            rule: "unknown-start-step",
            message: format!("start_step '{}' is not defined", start),
            step: None,
        }),
        Some(_) => {}
    }

    for (id, step) in workflow.steps() {
        let edges = [
            ("next_on_success", step.next_on_success()),
            ("next_on_failure", step.next_on_failure()),
        ];
        for (edge, target) in edges {
            if let Some(target) = target {
                if !workflow.contains(target) {
                    issues.push(ValidationIssue::for_step(
                        "unknown-successor",
                        id,
                        format!("Step '{}' {} references unknown step '{}'", id, edge, target),
                    ));
                }
            }
        }

        if let StepAction::Loop(args) = step.action() {
            if !workflow.contains(&args.body_step) {
                issues.push(ValidationIssue::for_step(
                    "unknown-body-step",
                    id,
                    format!(
                        "Loop step '{}' body_step references unknown step '{}'",
                        id, args.body_step
                    ),
                ));
            }
        }

        if let Some(previous) = step.action().previous_step() {
            if !workflow.contains(previous) {
                issues.push(ValidationIssue::for_step(
                    "unknown-previous-step",
                    id,
                    format!(
                        "Step '{}' reads from unknown previous_step '{}'",
                        id, previous
                    ),
                ));
            }
        }

        let mut conditions: Vec<&str> = Vec::new();
        if let Some(guard) = step.condition() {
            conditions.push(guard);
        }
        match step.action() {
            StepAction::Conditional(args) => conditions.push(args.condition.as_str()),
            StepAction::Loop(args) => conditions.push(args.condition.as_str()),
            _ => {}
        }
        for text in conditions {
            if let Err(e) = condition::parse(text) {
                issues.push(ValidationIssue::for_step(
                    "invalid-condition",
                    id,
                    format!("Step '{}' has an invalid condition '{}': {}", id, text, e),
                ));
            }
        }
    }

    issues
}
