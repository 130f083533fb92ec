//! The workflow container: named steps plus a start pointer.

use std::collections::BTreeMap;

use super::definition::StepDefinition;

/// A named collection of steps with an optional start step.
///
/// Step identifiers are opaque strings. Adding a step under an existing
/// identifier silently replaces it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workflow {
    name: String,
    description: String,
    start_step: Option<String>,
    steps: BTreeMap<String, StepDefinition>,
}

impl Workflow {
    /// Create an empty workflow.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            start_step: None,
            steps: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn start_step(&self) -> Option<&str> {
        self.start_step.as_deref()
    }

    /// Set or clear the start step. The identifier is not checked.
    pub fn set_start_step(&mut self, step_id: Option<String>) {
        self.start_step = step_id;
    }

    /// Add a step under `step_id`.
    ///
    /// The first step added becomes the start step unless one is already set.
    pub fn add_step(&mut self, step_id: impl Into<String>, step: StepDefinition) {
        let step_id = step_id.into();
        if self.start_step.is_none() {
            self.start_step = Some(step_id.clone());
        }
        self.steps.insert(step_id, step);
    }

    /// Builder-style [`add_step`](Self::add_step).
    pub fn with_step(mut self, step_id: impl Into<String>, step: StepDefinition) -> Self {
        self.add_step(step_id, step);
        self
    }

    pub fn step(&self, step_id: &str) -> Option<&StepDefinition> {
        self.steps.get(step_id)
    }

    pub fn contains(&self, step_id: &str) -> bool {
        self.steps.contains_key(step_id)
    }

    /// Iterate steps in identifier order.
    pub fn steps(&self) -> impl Iterator<Item = (&str, &StepDefinition)> {
        self.steps.iter().map(|(id, step)| (id.as_str(), step))
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step identifiers following `next_on_success` from the start step.
    ///
    /// Stops at a missing or already-listed identifier, so cycles terminate.
    pub fn success_chain(&self) -> Vec<&str> {
        let mut chain: Vec<&str> = Vec::new();
        let mut current = self.start_step();
        while let Some(id) = current {
            if chain.contains(&id) {
                break;
            }
            let Some((key, step)) = self.steps.get_key_value(id) else {
                break;
            };
            chain.push(key.as_str());
            current = step.next_on_success();
        }
        chain
    }
}
