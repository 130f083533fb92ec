//! Step definitions and their typed arguments.
//!
//! A [`StepDefinition`] keeps the raw `arguments` object exactly as it was
//! authored (so documents survive a decode/encode round-trip) alongside a
//! typed [`StepAction`] parsed from it at construction time.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::{CodeflowError, Result};

/// The closed set of step kinds a workflow can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    CodeGeneration,
    CodeEditing,
    CodeReview,
    CodeRefactoring,
    TestGeneration,
    Documentation,
    UserInput,
    FileOperation,
    Conditional,
    Loop,
}

impl StepType {
    /// All step types, in documentation order.
    pub const ALL: [StepType; 10] = [
        StepType::CodeGeneration,
        StepType::CodeEditing,
        StepType::CodeReview,
        StepType::CodeRefactoring,
        StepType::TestGeneration,
        StepType::Documentation,
        StepType::UserInput,
        StepType::FileOperation,
        StepType::Conditional,
        StepType::Loop,
    ];

    /// The wire name used in workflow documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepType::CodeGeneration => "code_generation",
            StepType::CodeEditing => "code_editing",
            StepType::CodeReview => "code_review",
            StepType::CodeRefactoring => "code_refactoring",
            StepType::TestGeneration => "test_generation",
            StepType::Documentation => "documentation",
            StepType::UserInput => "user_input",
            StepType::FileOperation => "file_operation",
            StepType::Conditional => "conditional",
            StepType::Loop => "loop",
        }
    }

    /// Whether executing this step type contacts the generation service.
    pub fn uses_generation(&self) -> bool {
        matches!(
            self,
            StepType::CodeGeneration
                | StepType::CodeEditing
                | StepType::CodeReview
                | StepType::CodeRefactoring
                | StepType::TestGeneration
                | StepType::Documentation
        )
    }
}

impl fmt::Display for StepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StepType {
    type Err = CodeflowError;

    fn from_str(s: &str) -> Result<Self> {
        StepType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CodeflowError::UnsupportedStepType {
                step_type: s.to_string(),
            })
    }
}

fn default_input_prompt() -> String {
    "Enter input: ".to_string()
}

/// An explicit `null` reads the same as an absent key.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn input_prompt<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_input_prompt))
}

/// Arguments for `user_input` steps.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserInputArgs {
    #[serde(default = "default_input_prompt", deserialize_with = "input_prompt")]
    pub prompt: String,
}

/// Arguments for `code_generation` steps.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GenerationArgs {
    #[serde(deserialize_with = "null_as_default")]
    pub task: String,
    pub language: Option<String>,
}

/// Where a code-processing step gets its input code from.
///
/// Used by review, refactoring, test generation and documentation steps.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SourceArgs {
    pub filename: Option<String>,
    pub previous_step: Option<String>,
    pub language: Option<String>,
}

/// Arguments for `code_editing` steps.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditArgs {
    pub filename: Option<String>,
    pub previous_step: Option<String>,
    pub language: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub instruction: String,
    #[serde(deserialize_with = "null_as_default")]
    pub save: bool,
}

impl EditArgs {
    /// The source portion of the arguments.
    pub fn source(&self) -> SourceArgs {
        SourceArgs {
            filename: self.filename.clone(),
            previous_step: self.previous_step.clone(),
            language: self.language.clone(),
        }
    }
}

/// Arguments for `file_operation` steps.
///
/// Missing or unknown values are reported as recoverable step errors at
/// execution time, not rejected here.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FileOperationArgs {
    pub operation: Option<String>,
    pub filename: Option<String>,
    pub content: Option<String>,
    pub previous_step: Option<String>,
}

/// Arguments for `conditional` steps.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConditionalArgs {
    pub condition: String,
}

/// Arguments for `loop` steps.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoopArgs {
    pub condition: String,
    pub body_step: String,
}

/// Typed view of a step's arguments, one variant per step type.
#[derive(Debug, Clone, PartialEq)]
pub enum StepAction {
    UserInput(UserInputArgs),
    CodeGeneration(GenerationArgs),
    CodeEditing(EditArgs),
    FileOperation(FileOperationArgs),
    CodeReview(SourceArgs),
    CodeRefactoring(SourceArgs),
    TestGeneration(SourceArgs),
    Documentation(SourceArgs),
    Conditional(ConditionalArgs),
    Loop(LoopArgs),
}

fn parse_args<T: DeserializeOwned>(arguments: &Map<String, Value>) -> serde_json::Result<T> {
    serde_json::from_value(Value::Object(arguments.clone()))
}

impl StepAction {
    /// Parse raw arguments for the given step type.
    pub fn parse(step_type: StepType, arguments: &Map<String, Value>) -> serde_json::Result<Self> {
        Ok(match step_type {
            StepType::UserInput => StepAction::UserInput(parse_args(arguments)?),
            StepType::CodeGeneration => StepAction::CodeGeneration(parse_args(arguments)?),
            StepType::CodeEditing => StepAction::CodeEditing(parse_args(arguments)?),
            StepType::FileOperation => StepAction::FileOperation(parse_args(arguments)?),
            StepType::CodeReview => StepAction::CodeReview(parse_args(arguments)?),
            StepType::CodeRefactoring => StepAction::CodeRefactoring(parse_args(arguments)?),
            StepType::TestGeneration => StepAction::TestGeneration(parse_args(arguments)?),
            StepType::Documentation => StepAction::Documentation(parse_args(arguments)?),
            StepType::Conditional => StepAction::Conditional(parse_args(arguments)?),
            StepType::Loop => StepAction::Loop(parse_args(arguments)?),
        })
    }

    /// The step type this action belongs to.
    pub fn step_type(&self) -> StepType {
        match self {
            StepAction::UserInput(_) => StepType::UserInput,
            StepAction::CodeGeneration(_) => StepType::CodeGeneration,
            StepAction::CodeEditing(_) => StepType::CodeEditing,
            StepAction::FileOperation(_) => StepType::FileOperation,
            StepAction::CodeReview(_) => StepType::CodeReview,
            StepAction::CodeRefactoring(_) => StepType::CodeRefactoring,
            StepAction::TestGeneration(_) => StepType::TestGeneration,
            StepAction::Documentation(_) => StepType::Documentation,
            StepAction::Conditional(_) => StepType::Conditional,
            StepAction::Loop(_) => StepType::Loop,
        }
    }

    /// The prior step this action reads code from, if any.
    pub fn previous_step(&self) -> Option<&str> {
        match self {
            StepAction::CodeEditing(args) => args.previous_step.as_deref(),
            StepAction::FileOperation(args) => args.previous_step.as_deref(),
            StepAction::CodeReview(args)
            | StepAction::CodeRefactoring(args)
            | StepAction::TestGeneration(args)
            | StepAction::Documentation(args) => args.previous_step.as_deref(),
            _ => None,
        }
    }
}

/// An immutable description of one unit of work.
///
/// Identity is the key under which the step is stored in a
/// [`Workflow`](super::Workflow), not a field of the step itself.
#[derive(Debug, Clone, PartialEq)]
pub struct StepDefinition {
    step_type: StepType,
    description: String,
    arguments: Map<String, Value>,
    action: StepAction,
    condition: Option<String>,
    next_on_success: Option<String>,
    next_on_failure: Option<String>,
}

impl StepDefinition {
    /// Create a step, parsing `arguments` for its type.
    ///
    /// `arguments` must be a JSON object (or `null`, treated as empty).
    ///
    /// # Errors
    ///
    /// Returns `InvalidArguments` when a required argument is missing or
    /// an argument has the wrong JSON type.
    pub fn new(step_type: StepType, description: impl Into<String>, arguments: Value) -> Result<Self> {
        let arguments = match arguments {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(CodeflowError::InvalidArguments {
                    step: step_type.to_string(),
                    message: format!("arguments must be an object, got {}", other),
                })
            }
        };
        Self::from_parts(step_type, description.into(), arguments)
    }

    pub(crate) fn from_parts(
        step_type: StepType,
        description: String,
        arguments: Map<String, Value>,
    ) -> Result<Self> {
        let action = StepAction::parse(step_type, &arguments).map_err(|e| {
            CodeflowError::InvalidArguments {
                step: step_type.to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(Self {
            step_type,
            description,
            arguments,
            action,
            condition: None,
            next_on_success: None,
            next_on_failure: None,
        })
    }

    /// Set the guard condition.
    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// Set the successor followed after a successful execution.
    pub fn on_success(mut self, step_id: impl Into<String>) -> Self {
        self.next_on_success = Some(step_id.into());
        self
    }

    /// Set the successor followed after a failure or an unmet guard.
    pub fn on_failure(mut self, step_id: impl Into<String>) -> Self {
        self.next_on_failure = Some(step_id.into());
        self
    }

    pub(crate) fn with_edges(
        mut self,
        condition: Option<String>,
        next_on_success: Option<String>,
        next_on_failure: Option<String>,
    ) -> Self {
        self.condition = condition;
        self.next_on_success = next_on_success;
        self.next_on_failure = next_on_failure;
        self
    }

    pub fn step_type(&self) -> StepType {
        self.step_type
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The raw arguments, exactly as authored.
    pub fn arguments(&self) -> &Map<String, Value> {
        &self.arguments
    }

    /// The typed arguments.
    pub fn action(&self) -> &StepAction {
        &self.action
    }

    pub fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }

    pub fn next_on_success(&self) -> Option<&str> {
        self.next_on_success.as_deref()
    }

    pub fn next_on_failure(&self) -> Option<&str> {
        self.next_on_failure.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_optional_arguments_take_defaults() {
        let ask = StepDefinition::new(StepType::UserInput, "", json!({"prompt": null})).unwrap();
        assert_eq!(
            ask.action(),
            &StepAction::UserInput(UserInputArgs {
                prompt: "Enter input: ".to_string()
            })
        );

        let edit = StepDefinition::new(
            StepType::CodeEditing,
            "",
            json!({"filename": null, "instruction": null, "save": null}),
        )
        .unwrap();
        assert_eq!(edit.action(), &StepAction::CodeEditing(EditArgs::default()));

        let gen = StepDefinition::new(StepType::CodeGeneration, "", json!({"task": null})).unwrap();
        assert_eq!(gen.action(), &StepAction::CodeGeneration(GenerationArgs::default()));
    }

    #[test]
    fn null_required_argument_is_still_invalid() {
        let err = StepDefinition::new(
            StepType::Loop,
            "",
            json!({"condition": "True", "body_step": null}),
        )
        .unwrap_err();
        assert!(matches!(err, CodeflowError::InvalidArguments { .. }));
    }

    #[test]
    fn step_type_wire_names_round_trip() {
        for step_type in StepType::ALL {
            let parsed: StepType = step_type.as_str().parse().unwrap();
            assert_eq!(parsed, step_type);
            let json = serde_json::to_value(step_type).unwrap();
            assert_eq!(json, json!(step_type.as_str()));
        }
    }

    #[test]
    fn unknown_step_type_is_rejected() {
        let err = "compile".parse::<StepType>().unwrap_err();
        assert!(matches!(err, CodeflowError::UnsupportedStepType { .. }));
    }

    #[test]
    fn user_input_prompt_has_default() {
        let step = StepDefinition::new(StepType::UserInput, "ask", json!({})).unwrap();
        match step.action() {
            StepAction::UserInput(args) => assert_eq!(args.prompt, "Enter input: "),
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn conditional_requires_condition() {
        let err = StepDefinition::new(StepType::Conditional, "branch", json!({})).unwrap_err();
        match err {
            CodeflowError::InvalidArguments { message, .. } => {
                assert!(message.contains("condition"))
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn loop_requires_body_step() {
        let err = StepDefinition::new(StepType::Loop, "repeat", json!({"condition": "True"}))
            .unwrap_err();
        assert!(err.to_string().contains("body_step"));
    }

    #[test]
    fn mistyped_argument_is_rejected() {
        let err = StepDefinition::new(
            StepType::CodeEditing,
            "edit",
            json!({"filename": "a.py", "save": "yes"}),
        )
        .unwrap_err();
        assert!(matches!(err, CodeflowError::InvalidArguments { .. }));
    }

    #[test]
    fn non_object_arguments_are_rejected() {
        let err = StepDefinition::new(StepType::CodeGeneration, "gen", json!([1, 2])).unwrap_err();
        assert!(matches!(err, CodeflowError::InvalidArguments { .. }));
    }

    #[test]
    fn null_arguments_are_empty() {
        let step = StepDefinition::new(StepType::CodeReview, "review", Value::Null).unwrap();
        assert!(step.arguments().is_empty());
        assert_eq!(step.action(), &StepAction::CodeReview(SourceArgs::default()));
    }

    #[test]
    fn unknown_arguments_are_kept_verbatim() {
        let step = StepDefinition::new(
            StepType::CodeGeneration,
            "gen",
            json!({"task": "sort a list", "style": "terse"}),
        )
        .unwrap();
        assert_eq!(step.arguments()["style"], json!("terse"));
        match step.action() {
            StepAction::CodeGeneration(args) => assert_eq!(args.task, "sort a list"),
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn builder_sets_edges() {
        let step = StepDefinition::new(StepType::CodeGeneration, "gen", json!({"task": "x"}))
            .unwrap()
            .with_condition("True")
            .on_success("next")
            .on_failure("fallback");
        assert_eq!(step.condition(), Some("True"));
        assert_eq!(step.next_on_success(), Some("next"));
        assert_eq!(step.next_on_failure(), Some("fallback"));
    }

    #[test]
    fn previous_step_is_exposed_for_code_consumers() {
        let step = StepDefinition::new(
            StepType::TestGeneration,
            "tests",
            json!({"previous_step": "gen"}),
        )
        .unwrap();
        assert_eq!(step.action().previous_step(), Some("gen"));
        assert_eq!(step.action().step_type(), StepType::TestGeneration);
    }

    #[test]
    fn generation_types_are_flagged() {
        assert!(StepType::CodeReview.uses_generation());
        assert!(!StepType::FileOperation.uses_generation());
        assert!(!StepType::Loop.uses_generation());
    }
}
