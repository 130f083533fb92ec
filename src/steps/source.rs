//! Resolve the code a step operates on.

use std::io::ErrorKind;
use thiserror::Error;

use crate::runner::ResultStore;
use crate::workflow::SourceArgs;

/// Why no source code could be resolved. Always recoverable.
#[derive(Debug, Error, PartialEq)]
pub enum SourceError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to read {path}: {message}")]
    Unreadable { path: String, message: String },

    #[error("Step '{step}' has no code result to use")]
    MissingPreviousCode { step: String },

    #[error("No source given: set either filename or previous_step")]
    NoSource,
}

/// Load code from `filename` if given, else from the `code` field of the
/// `previous_step` result.
pub fn resolve_source(args: &SourceArgs, results: &ResultStore) -> Result<String, SourceError> {
    if let Some(path) = &args.filename {
        return std::fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => SourceError::FileNotFound { path: path.clone() },
            _ => SourceError::Unreadable {
                path: path.clone(),
                message: e.to_string(),
            },
        });
    }

    match &args.previous_step {
        Some(step) => results
            .get(step)
            .and_then(|record| record.code())
            .map(str::to_string)
            .ok_or_else(|| SourceError::MissingPreviousCode { step: step.clone() }),
        None => Err(SourceError::NoSource),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::StepOutput;
    use tempfile::TempDir;

    fn store_with_code(step: &str, code: &str) -> ResultStore {
        let mut store = ResultStore::new();
        store.insert(
            step,
            StepOutput::Generated {
                code: code.into(),
                full_response: code.into(),
            }
            .into_record(),
        );
        store
    }

    #[test]
    fn reads_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.py");
        std::fs::write(&path, "print(1)").unwrap();

        let args = SourceArgs {
            filename: Some(path.to_string_lossy().into_owned()),
            ..SourceArgs::default()
        };
        assert_eq!(resolve_source(&args, &ResultStore::new()).unwrap(), "print(1)");
    }

    #[test]
    fn file_wins_over_previous_step() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.py");
        std::fs::write(&path, "from file").unwrap();

        let args = SourceArgs {
            filename: Some(path.to_string_lossy().into_owned()),
            previous_step: Some("gen".into()),
            language: None,
        };
        let store = store_with_code("gen", "from step");
        assert_eq!(resolve_source(&args, &store).unwrap(), "from file");
    }

    #[test]
    fn missing_file_is_recoverable() {
        let args = SourceArgs {
            filename: Some("/definitely/not/here.py".into()),
            ..SourceArgs::default()
        };
        assert_eq!(
            resolve_source(&args, &ResultStore::new()).unwrap_err(),
            SourceError::FileNotFound {
                path: "/definitely/not/here.py".into()
            }
        );
    }

    #[test]
    fn reads_previous_step_code() {
        let args = SourceArgs {
            previous_step: Some("gen".into()),
            ..SourceArgs::default()
        };
        let store = store_with_code("gen", "x = 1");
        assert_eq!(resolve_source(&args, &store).unwrap(), "x = 1");
    }

    #[test]
    fn previous_step_without_result() {
        let args = SourceArgs {
            previous_step: Some("gen".into()),
            ..SourceArgs::default()
        };
        assert!(matches!(
            resolve_source(&args, &ResultStore::new()),
            Err(SourceError::MissingPreviousCode { .. })
        ));
    }

    #[test]
    fn no_source_at_all() {
        assert_eq!(
            resolve_source(&SourceArgs::default(), &ResultStore::new()).unwrap_err(),
            SourceError::NoSource
        );
    }
}
