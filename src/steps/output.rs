//! Step results.
//!
//! Each step type produces a [`StepOutput`] variant with an explicit shape.
//! Once stored, an output becomes an open [`ResultRecord`] so later steps,
//! conditions and the confirmation gate can read fields by name.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// What one step execution produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StepOutput {
    /// `user_input`
    Input { input: String },
    /// `code_generation`, `test_generation`, `documentation`
    Generated { code: String, full_response: String },
    /// `code_editing`, `code_refactoring`
    Edited {
        code: String,
        original_code: String,
        full_response: String,
    },
    /// `code_review`
    Review { review: String },
    /// `file_operation` read
    FileRead { content: String },
    /// `file_operation` write
    FileWritten { filename: String, success: bool },
    /// `conditional`
    Branch {
        condition: bool,
        next_step: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    /// `loop`
    Loop {
        #[serde(rename = "loop")]
        looping: bool,
        next_step: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    /// Recoverable failure, routed to `next_on_failure`.
    Failed { error: String },
}

impl StepOutput {
    /// Shorthand for a recoverable failure.
    pub fn failed(error: impl Into<String>) -> Self {
        StepOutput::Failed {
            error: error.into(),
        }
    }

    /// Whether this output reports an error.
    pub fn is_error(&self) -> bool {
        match self {
            StepOutput::Failed { .. } => true,
            StepOutput::Branch { error, .. } | StepOutput::Loop { error, .. } => error.is_some(),
            _ => false,
        }
    }

    /// Convert into the open record stored in the result store.
    pub fn into_record(self) -> ResultRecord {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => ResultRecord(map),
            Ok(other) => ResultRecord::from_error(format!("unexpected step output: {}", other)),
            Err(e) => ResultRecord::from_error(e.to_string()),
        }
    }
}

/// Open mapping of field name to value produced by one step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultRecord(Map<String, Value>);

impl ResultRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// A record holding only an `error` field.
    pub fn from_error(message: impl Into<String>) -> Self {
        let mut map = Map::new();
        map.insert("error".to_string(), Value::String(message.into()));
        Self(map)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.0.insert(field.into(), value);
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    fn str_field(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// The `code` field, if it is a string.
    pub fn code(&self) -> Option<&str> {
        self.str_field("code")
    }

    /// The `content` field, if it is a string.
    pub fn content(&self) -> Option<&str> {
        self.str_field("content")
    }

    /// The `error` field, if present.
    pub fn error(&self) -> Option<&str> {
        self.str_field("error")
    }

    pub fn is_error(&self) -> bool {
        self.0.contains_key("error")
    }

    /// The control-flow hint left by conditional and loop steps.
    ///
    /// `None` means the record has no `next_step` key. `Some(None)` means
    /// the key is present and null, which stops traversal.
    pub fn next_step(&self) -> Option<Option<&str>> {
        self.0.get("next_step").map(Value::as_str)
    }

    /// Replace the `code` field.
    pub fn set_code(&mut self, code: impl Into<String>) {
        self.0.insert("code".to_string(), Value::String(code.into()));
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for ResultRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
