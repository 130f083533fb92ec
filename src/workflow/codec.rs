//! Workflow document encoding and decoding.
//!
//! The persisted format is JSON:
//!
//! ```json
//! {
//!   "name": "reverse",
//!   "description": "Generate and save a string reverser",
//!   "start_step": "gen",
//!   "steps": {
//!     "gen": {
//!       "step_type": "code_generation",
//!       "description": "Generate code",
//!       "arguments": { "task": "reverse a string" },
//!       "condition": null,
//!       "next_on_success": "save",
//!       "next_on_failure": null
//!     }
//!   }
//! }
//! ```
//!
//! Decoding followed by encoding reproduces the document field for field.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{CodeflowError, Result};

use super::definition::{StepDefinition, StepType};
use super::model::Workflow;

/// Serialized form of a whole workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDocument {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub start_step: Option<String>,
    #[serde(default)]
    pub steps: BTreeMap<String, StepDocument>,
}

/// Serialized form of one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepDocument {
    pub step_type: StepType,
    pub description: String,
    pub arguments: Map<String, Value>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub next_on_success: Option<String>,
    #[serde(default)]
    pub next_on_failure: Option<String>,
}

/// Encode a workflow into its document form.
pub fn encode(workflow: &Workflow) -> WorkflowDocument {
    let steps = workflow
        .steps()
        .map(|(id, step)| {
            (
                id.to_string(),
                StepDocument {
                    step_type: step.step_type(),
                    description: step.description().to_string(),
                    arguments: step.arguments().clone(),
                    condition: step.condition().map(String::from),
                    next_on_success: step.next_on_success().map(String::from),
                    next_on_failure: step.next_on_failure().map(String::from),
                },
            )
        })
        .collect();

    WorkflowDocument {
        name: workflow.name().to_string(),
        description: workflow.description().to_string(),
        start_step: workflow.start_step().map(String::from),
        steps,
    }
}

/// Decode a document into a workflow.
///
/// The start step is taken verbatim from the document, even when absent.
///
/// # Errors
///
/// Returns `InvalidArguments` (naming the step) if a step's arguments do
/// not fit its type.
pub fn decode(document: WorkflowDocument) -> Result<Workflow> {
    let mut workflow = Workflow::new(document.name, document.description);

    for (id, step) in document.steps {
        let definition = StepDefinition::from_parts(step.step_type, step.description, step.arguments)
            .map_err(|e| match e {
                CodeflowError::InvalidArguments { message, .. } => {
                    CodeflowError::InvalidArguments {
                        step: id.clone(),
                        message,
                    }
                }
                other => other,
            })?
            .with_edges(step.condition, step.next_on_success, step.next_on_failure);
        workflow.add_step(id, definition);
    }

    workflow.set_start_step(document.start_step);
    Ok(workflow)
}

/// Decode a workflow from a JSON value.
pub fn from_value(value: Value) -> Result<Workflow> {
    let document: WorkflowDocument = serde_json::from_value(value).map_err(decode_error)?;
    decode(document)
}

/// Encode a workflow as a JSON value.
pub fn to_value(workflow: &Workflow) -> Result<Value> {
    Ok(serde_json::to_value(encode(workflow))?)
}

/// Decode a workflow from JSON text.
pub fn from_json(text: &str) -> Result<Workflow> {
    let document: WorkflowDocument = serde_json::from_str(text).map_err(decode_error)?;
    decode(document)
}

/// Encode a workflow as pretty-printed JSON text.
pub fn to_json(workflow: &Workflow) -> Result<String> {
    Ok(serde_json::to_string_pretty(&encode(workflow))?)
}

/// Save a workflow as JSON, creating parent directories as needed.
pub fn save_to_file(workflow: &Workflow, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, to_json(workflow)?)?;
    Ok(())
}

/// Load a workflow from a JSON file.
///
/// # Errors
///
/// Returns `WorkflowNotFound` if the file doesn't exist and
/// `WorkflowDecode` if its content is not a valid workflow document.
pub fn load_from_file(path: &Path) -> Result<Workflow> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CodeflowError::WorkflowNotFound {
                path: path.to_path_buf(),
            }
        } else {
            CodeflowError::Io(e)
        }
    })?;

    from_json(&content)
}

fn decode_error(e: serde_json::Error) -> CodeflowError {
    CodeflowError::WorkflowDecode {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample_document() -> Value {
        json!({
            "name": "reverse",
            "description": "Generate and save a string reverser",
            "start_step": "gen",
            "steps": {
                "gen": {
                    "step_type": "code_generation",
                    "description": "Generate code",
                    "arguments": {"task": "reverse a string"},
                    "condition": null,
                    "next_on_success": "save",
                    "next_on_failure": null
                },
                "save": {
                    "step_type": "file_operation",
                    "description": "Save code",
                    "arguments": {"operation": "write", "filename": "out.txt", "previous_step": "gen"},
                    "condition": "{gen.code} != None",
                    "next_on_success": null,
                    "next_on_failure": "gen"
                }
            }
        })
    }

    #[test]
    fn decode_then_encode_is_identity() {
        let doc = sample_document();
        let workflow = from_value(doc.clone()).unwrap();
        assert_eq!(to_value(&workflow).unwrap(), doc);
    }

    #[test]
    fn decode_preserves_edges() {
        let workflow = from_value(sample_document()).unwrap();
        let save = workflow.step("save").unwrap();
        assert_eq!(save.step_type(), StepType::FileOperation);
        assert_eq!(save.condition(), Some("{gen.code} != None"));
        assert_eq!(save.next_on_failure(), Some("gen"));
        assert_eq!(workflow.start_step(), Some("gen"));
    }

    #[test]
    fn missing_start_step_stays_absent() {
        let mut doc = sample_document();
        doc.as_object_mut().unwrap().remove("start_step");
        let workflow = from_value(doc).unwrap();
        assert_eq!(workflow.start_step(), None);
    }

    #[test]
    fn unknown_step_type_fails_to_decode() {
        let mut doc = sample_document();
        doc["steps"]["gen"]["step_type"] = json!("compile");
        let err = from_value(doc).unwrap_err();
        assert!(matches!(err, CodeflowError::WorkflowDecode { .. }));
    }

    #[test]
    fn missing_name_fails_to_decode() {
        let mut doc = sample_document();
        doc.as_object_mut().unwrap().remove("name");
        let err = from_value(doc).unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn missing_description_fails_to_decode() {
        let mut doc = sample_document();
        doc.as_object_mut().unwrap().remove("description");
        assert!(matches!(
            from_value(doc).unwrap_err(),
            CodeflowError::WorkflowDecode { .. }
        ));
    }

    #[test]
    fn invalid_arguments_name_the_step() {
        let mut doc = sample_document();
        doc["steps"]["gen"]["step_type"] = json!("conditional");
        match from_value(doc).unwrap_err() {
            CodeflowError::InvalidArguments { step, .. } => assert_eq!(step, "gen"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn save_creates_parent_directories() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/dir/flow.json");
        let workflow = from_value(sample_document()).unwrap();

        save_to_file(&workflow, &path).unwrap();
        let loaded = load_from_file(&path).unwrap();
        assert_eq!(loaded, workflow);
    }

    #[test]
    fn saved_json_is_indented() {
        let workflow = from_value(sample_document()).unwrap();
        let text = to_json(&workflow).unwrap();
        assert!(text.contains("\n  \"name\": \"reverse\""));
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let temp = TempDir::new().unwrap();
        let err = load_from_file(&temp.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, CodeflowError::WorkflowNotFound { .. }));
    }

    #[test]
    fn load_garbage_is_decode_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            load_from_file(&path).unwrap_err(),
            CodeflowError::WorkflowDecode { .. }
        ));
    }
}
