//! Workflow traversal.
//!
//! The engine walks a [`Workflow`] from its start step, executing each step
//! and choosing the next one from the step's result and edges, until no
//! successor remains.
//!
//! In interactive mode the walk pauses after every step except `user_input`
//! and hands back a [`PendingConfirmation`]. The caller decides what to do
//! with the result and calls [`WorkflowEngine::resume`]. [`WorkflowEngine::execute`]
//! drives that loop with the console gate in [`super::confirmation`].

use tracing::{error, info, warn};

use crate::condition;
use crate::error::{CodeflowError, Result};
use crate::generation::TextGenerator;
use crate::steps::{ResultRecord, StepContext, StepExecutor, DEFAULT_LANGUAGE};
use crate::ui::UserInterface;
use crate::workflow::{StepDefinition, StepType, Workflow};

use super::confirmation::confirm_result;
use super::store::ResultStore;

/// Where a traversal stopped.
#[derive(Debug, Clone, PartialEq)]
pub enum Traversal {
    /// No successor remained.
    Finished,
    /// A result was rejected during confirmation.
    Halted { step: String },
    /// Waiting for a decision on a step's result.
    AwaitingConfirmation(PendingConfirmation),
}

/// Resumption handle for a traversal paused at the confirmation gate.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingConfirmation {
    step_id: String,
    record: ResultRecord,
    next: Option<String>,
}

impl PendingConfirmation {
    pub(crate) fn new(step_id: impl Into<String>, record: ResultRecord, next: Option<String>) -> Self {
        Self {
            step_id: step_id.into(),
            record,
            next,
        }
    }

    /// The step whose result awaits review.
    pub fn step_id(&self) -> &str {
        &self.step_id
    }

    /// The result under review.
    pub fn record(&self) -> &ResultRecord {
        &self.record
    }

    /// The step that runs next if the result is accepted.
    pub fn next_step(&self) -> Option<&str> {
        self.next.as_deref()
    }
}

/// What to do with a result at the confirmation gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Reject,
    /// Replace the result's `code` field, then continue as accepted.
    Edit(String),
}

/// Summary of a completed [`WorkflowEngine::execute`] call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    /// Steps entered, in order. Includes steps whose guard skipped them.
    pub visited: Vec<String>,
    /// The step whose result was rejected, if the run was halted.
    pub halted_at: Option<String>,
}

impl RunReport {
    /// Whether the traversal ran to the end.
    pub fn completed(&self) -> bool {
        self.halted_at.is_none()
    }
}

/// Owns a workflow's steps, start pointer and results, and runs them.
///
/// Results persist across calls so a run can be resumed from any step.
pub struct WorkflowEngine<'g> {
    workflow: Workflow,
    generator: &'g dyn TextGenerator,
    language: String,
    results: ResultStore,
    interactive_mode: bool,
    visited: Vec<String>,
}

impl<'g> WorkflowEngine<'g> {
    pub fn new(workflow: Workflow, generator: &'g dyn TextGenerator) -> Self {
        Self {
            workflow,
            generator,
            language: DEFAULT_LANGUAGE.to_string(),
            results: ResultStore::new(),
            interactive_mode: false,
            visited: Vec::new(),
        }
    }

    /// Default language for code-producing steps.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Add or replace a step. The first step added becomes the start step
    /// unless one is already set.
    pub fn add_step(&mut self, step_id: impl Into<String>, step: StepDefinition) {
        self.workflow.add_step(step_id, step);
    }

    pub fn set_start_step(&mut self, step_id: Option<String>) {
        self.workflow.set_start_step(step_id);
    }

    /// Toggle the confirmation gate between steps.
    pub fn set_interactive_mode(&mut self, enabled: bool) {
        self.interactive_mode = enabled;
    }

    pub fn interactive_mode(&self) -> bool {
        self.interactive_mode
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    pub fn results(&self) -> &ResultStore {
        &self.results
    }

    pub fn into_results(self) -> ResultStore {
        self.results
    }

    /// Steps entered since the last [`start`](Self::start).
    pub fn visited(&self) -> &[String] {
        &self.visited
    }

    /// Begin a traversal at `from`, or at the workflow's start step.
    ///
    /// # Errors
    ///
    /// `NoStartStep` when neither is available, `UnknownStep` when the
    /// traversal reaches an identifier that is not in the workflow. Results
    /// gathered before the error stay available through [`results`](Self::results).
    pub fn start(&mut self, from: Option<&str>, ui: &mut dyn UserInterface) -> Result<Traversal> {
        let first = from
            .or_else(|| self.workflow.start_step())
            .map(str::to_string)
            .ok_or(CodeflowError::NoStartStep)?;

        info!(
            "Running workflow '{}' from step '{}'",
            self.workflow.name(),
            first
        );
        self.visited.clear();
        self.traverse(Some(first), ui)
    }

    /// Continue a traversal paused at the confirmation gate.
    pub fn resume(
        &mut self,
        pending: PendingConfirmation,
        decision: Decision,
        ui: &mut dyn UserInterface,
    ) -> Result<Traversal> {
        match decision {
            Decision::Reject => {
                warn!("Result of step '{}' rejected, halting", pending.step_id);
                Ok(Traversal::Halted {
                    step: pending.step_id,
                })
            }
            Decision::Accept => self.traverse(pending.next, ui),
            Decision::Edit(code) => {
                if let Some(record) = self.results.get_mut(&pending.step_id) {
                    record.set_code(code);
                }
                info!("Result of step '{}' edited", pending.step_id);
                self.traverse(pending.next, ui)
            }
        }
    }

    /// Run to completion, answering confirmations through `ui`.
    pub fn execute(&mut self, from: Option<&str>, ui: &mut dyn UserInterface) -> Result<RunReport> {
        let mut state = self.start(from, ui)?;
        loop {
            match state {
                Traversal::Finished => {
                    info!("Workflow '{}' finished", self.workflow.name());
                    return Ok(RunReport {
                        visited: self.visited.clone(),
                        halted_at: None,
                    });
                }
                Traversal::Halted { step } => {
                    return Ok(RunReport {
                        visited: self.visited.clone(),
                        halted_at: Some(step),
                    });
                }
                Traversal::AwaitingConfirmation(pending) => {
                    let decision = confirm_result(ui, &pending)?;
                    state = self.resume(pending, decision, ui)?;
                }
            }
        }
    }

    fn traverse(
        &mut self,
        mut current: Option<String>,
        ui: &mut dyn UserInterface,
    ) -> Result<Traversal> {
        while let Some(step_id) = current.take() {
            let step = match self.workflow.step(&step_id) {
                Some(step) => step.clone(),
                None => {
                    error!("Step '{}' is not defined, halting", step_id);
                    return Err(CodeflowError::UnknownStep { step: step_id });
                }
            };
            self.visited.push(step_id.clone());

            if let Some(guard) = step.condition() {
                match condition::evaluate(guard, &self.results) {
                    Ok(true) => {}
                    Ok(false) => {
                        warn!("Skipping step '{}': condition '{}' is false", step_id, guard);
                        current = step.next_on_failure().map(str::to_string);
                        continue;
                    }
                    Err(e) => {
                        error!("Condition error in step '{}': {}", step_id, e);
                        self.results.insert(
                            step_id.as_str(),
                            ResultRecord::from_error(format!("Condition error: {}", e)),
                        );
                        current = step.next_on_failure().map(str::to_string);
                        continue;
                    }
                }
            }

            let executor = StepExecutor::new(self.generator).with_language(self.language.as_str());
            let outcome = {
                let mut ctx = StepContext {
                    results: &self.results,
                    ui: &mut *ui,
                };
                executor.execute(&step_id, &step, &mut ctx)
            };

            let record = match outcome {
                Ok(output) => output.into_record(),
                Err(e) => {
                    error!("Step '{}' failed: {}", step_id, e);
                    self.results
                        .insert(step_id.as_str(), ResultRecord::from_error(e.to_string()));
                    current = step.next_on_failure().map(str::to_string);
                    continue;
                }
            };

            if let Some(message) = record.error() {
                warn!("Step '{}' reported an error: {}", step_id, message);
            }

            let next = route(&step, &record);
            self.results.insert(step_id.as_str(), record.clone());

            if self.interactive_mode && step.step_type() != StepType::UserInput {
                return Ok(Traversal::AwaitingConfirmation(PendingConfirmation::new(
                    step_id, record, next,
                )));
            }

            current = next;
        }

        Ok(Traversal::Finished)
    }
}

/// Pick the successor after a step produced `record`.
///
/// An error record follows `next_on_failure`. Otherwise a `next_step` hint
/// wins (null stops), then `next_on_success`.
fn route(step: &StepDefinition, record: &ResultRecord) -> Option<String> {
    if record.is_error() {
        return step.next_on_failure().map(str::to_string);
    }
    match record.next_step() {
        Some(hint) => hint.map(str::to_string),
        None => step.next_on_success().map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::ScriptedGenerator;
    use crate::ui::MockUI;
    use serde_json::json;

    fn step(step_type: StepType, args: serde_json::Value) -> StepDefinition {
        StepDefinition::new(step_type, "", args).unwrap()
    }

    fn input(prompt: &str) -> StepDefinition {
        step(StepType::UserInput, json!({ "prompt": prompt }))
    }

    #[test]
    fn no_start_step_is_an_error() {
        let generator = ScriptedGenerator::new();
        let mut engine = WorkflowEngine::new(Workflow::new("empty", ""), &generator);
        let err = engine.execute(None, &mut MockUI::new()).unwrap_err();
        assert!(matches!(err, CodeflowError::NoStartStep));
    }

    #[test]
    fn follows_success_chain() {
        let generator = ScriptedGenerator::new();
        let workflow = Workflow::new("chain", "")
            .with_step("a", input("a").on_success("b"))
            .with_step("b", input("b").on_success("c"))
            .with_step("c", input("c"));

        let mut engine = WorkflowEngine::new(workflow, &generator);
        let report = engine.execute(None, &mut MockUI::new()).unwrap();

        assert_eq!(report.visited, vec!["a", "b", "c"]);
        assert!(report.completed());
        assert_eq!(engine.results().len(), 3);
    }

    #[test]
    fn unknown_successor_keeps_partial_results() {
        let generator = ScriptedGenerator::new();
        let workflow = Workflow::new("dangling", "").with_step("a", input("a").on_success("ghost"));

        let mut engine = WorkflowEngine::new(workflow, &generator);
        let err = engine.execute(None, &mut MockUI::new()).unwrap_err();

        assert!(matches!(err, CodeflowError::UnknownStep { ref step } if step == "ghost"));
        assert!(engine.results().contains("a"));
    }

    #[test]
    fn explicit_start_overrides_workflow_start() {
        let generator = ScriptedGenerator::new();
        let workflow = Workflow::new("chain", "")
            .with_step("a", input("a").on_success("b"))
            .with_step("b", input("b"));

        let mut engine = WorkflowEngine::new(workflow, &generator);
        let report = engine.execute(Some("b"), &mut MockUI::new()).unwrap();
        assert_eq!(report.visited, vec!["b"]);
    }

    #[test]
    fn false_guard_skips_without_result() {
        let generator = ScriptedGenerator::new();
        let workflow = Workflow::new("guard", "")
            .with_step(
                "a",
                input("a")
                    .with_condition("False")
                    .on_success("never")
                    .on_failure("b"),
            )
            .with_step("b", input("b"));

        let mut engine = WorkflowEngine::new(workflow, &generator);
        let report = engine.execute(None, &mut MockUI::new()).unwrap();

        assert_eq!(report.visited, vec!["a", "b"]);
        assert!(!engine.results().contains("a"));
    }

    #[test]
    fn broken_guard_records_error() {
        let generator = ScriptedGenerator::new();
        let workflow = Workflow::new("guard", "")
            .with_step("a", input("a").with_condition("{x.y} ==").on_failure("b"))
            .with_step("b", input("b"));

        let mut engine = WorkflowEngine::new(workflow, &generator);
        engine.execute(None, &mut MockUI::new()).unwrap();

        let record = engine.results().get("a").unwrap();
        assert!(record.error().unwrap().starts_with("Condition error"));
        assert!(engine.results().contains("b"));
    }

    #[test]
    fn execution_error_follows_failure_edge() {
        let generator = ScriptedGenerator::new();
        let workflow = Workflow::new("fail", "")
            .with_step(
                "gen",
                step(StepType::CodeGeneration, json!({"task": "x"}))
                    .on_success("ok")
                    .on_failure("recover"),
            )
            .with_step("ok", input("ok"))
            .with_step("recover", input("recover"));

        let mut engine = WorkflowEngine::new(workflow, &generator);
        let report = engine.execute(None, &mut MockUI::new()).unwrap();

        assert_eq!(report.visited, vec!["gen", "recover"]);
        assert!(engine.results().get("gen").unwrap().is_error());
    }

    #[test]
    fn conditional_hint_redirects() {
        let generator = ScriptedGenerator::new();
        let workflow = Workflow::new("branch", "")
            .with_step(
                "check",
                step(StepType::Conditional, json!({"condition": "False"}))
                    .on_success("yes")
                    .on_failure("no"),
            )
            .with_step("yes", input("yes"))
            .with_step("no", input("no"));

        let mut engine = WorkflowEngine::new(workflow, &generator);
        let report = engine.execute(None, &mut MockUI::new()).unwrap();
        assert_eq!(report.visited, vec!["check", "no"]);
    }

    #[test]
    fn null_hint_stops_traversal() {
        let generator = ScriptedGenerator::new();
        let workflow = Workflow::new("branch", "")
            .with_step(
                "check",
                step(StepType::Conditional, json!({"condition": "True"})),
            )
            .with_step("unreached", input("x"));

        let mut engine = WorkflowEngine::new(workflow, &generator);
        let report = engine.execute(Some("check"), &mut MockUI::new()).unwrap();
        assert_eq!(report.visited, vec!["check"]);
    }

    #[test]
    fn interactive_mode_pauses_after_non_input_steps() {
        let generator = ScriptedGenerator::new().with_response("```python\nx = 1\n```");
        let workflow = Workflow::new("gate", "")
            .with_step("ask", input("?").on_success("gen"))
            .with_step(
                "gen",
                step(StepType::CodeGeneration, json!({"task": "x"})).on_success("done"),
            )
            .with_step("done", input("done"));

        let mut engine = WorkflowEngine::new(workflow, &generator);
        engine.set_interactive_mode(true);
        let mut ui = MockUI::new();

        let pending = match engine.start(None, &mut ui).unwrap() {
            Traversal::AwaitingConfirmation(pending) => pending,
            other => panic!("expected a pause, got {:?}", other),
        };
        assert_eq!(pending.step_id(), "gen");
        assert_eq!(pending.next_step(), Some("done"));
        assert_eq!(pending.record().code(), Some("x = 1"));

        let state = engine
            .resume(pending, Decision::Edit("x = 2".into()), &mut ui)
            .unwrap();
        assert_eq!(state, Traversal::Finished);
        assert_eq!(engine.results().get("gen").unwrap().code(), Some("x = 2"));
        assert_eq!(engine.visited(), &["ask", "gen", "done"]);
    }

    #[test]
    fn rejection_halts_with_partial_results() {
        let generator = ScriptedGenerator::new().with_response("code");
        let workflow = Workflow::new("gate", "")
            .with_step(
                "gen",
                step(StepType::CodeGeneration, json!({"task": "x"})).on_success("next"),
            )
            .with_step("next", input("next"));

        let mut engine = WorkflowEngine::new(workflow, &generator);
        engine.set_interactive_mode(true);
        let mut ui = MockUI::new();
        ui.set_prompt_response("confirm_gen", "n");

        let report = engine.execute(None, &mut ui).unwrap();
        assert_eq!(report.halted_at.as_deref(), Some("gen"));
        assert!(engine.results().contains("gen"));
        assert!(!engine.results().contains("next"));
    }

    #[test]
    fn results_persist_across_runs() {
        let generator = ScriptedGenerator::new();
        let workflow = Workflow::new("two", "")
            .with_step("a", input("a"))
            .with_step("b", input("b"));

        let mut engine = WorkflowEngine::new(workflow, &generator);
        let mut ui = MockUI::new();
        engine.execute(Some("a"), &mut ui).unwrap();
        engine.execute(Some("b"), &mut ui).unwrap();

        assert!(engine.results().contains("a"));
        assert!(engine.results().contains("b"));
    }

    #[test]
    fn add_step_sets_start_when_missing() {
        let generator = ScriptedGenerator::new();
        let mut engine = WorkflowEngine::new(Workflow::new("built", ""), &generator);
        engine.add_step("first", input("first"));
        engine.add_step("second", input("second"));
        assert_eq!(engine.workflow().start_step(), Some("first"));
    }
}
