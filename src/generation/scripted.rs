//! Scripted generator for tests and dry runs.
//!
//! # Example
//!
//! ```
//! use codeflow::generation::{ScriptedGenerator, TextGenerator};
//!
//! let generator = ScriptedGenerator::new()
//!     .with_response("```python\nprint('hi')\n```");
//!
//! let text = generator.generate("write hello world").unwrap();
//! assert!(text.contains("print"));
//! assert_eq!(generator.prompts(), vec!["write hello world".to_string()]);
//! ```

use std::cell::RefCell;
use std::collections::VecDeque;

use super::{GenerationError, TextGenerator};

/// Serves queued responses in order and records every prompt it receives.
///
/// When the queue runs dry the fallback response is used; without a
/// fallback an exhausted generator returns [`GenerationError::EmptyResponse`].
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    queue: RefCell<VecDeque<Result<String, GenerationError>>>,
    fallback: Option<String>,
    prompts: RefCell<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response.
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.queue.borrow_mut().push_back(Ok(response.into()));
        self
    }

    /// Queue a failure.
    pub fn with_error(self, error: GenerationError) -> Self {
        self.queue.borrow_mut().push_back(Err(error));
        self
    }

    /// Response served once the queue is empty.
    pub fn with_fallback(mut self, response: impl Into<String>) -> Self {
        self.fallback = Some(response.into());
        self
    }

    /// Every prompt received so far, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }

    /// Number of queued outcomes not yet served.
    pub fn remaining(&self) -> usize {
        self.queue.borrow().len()
    }
}

impl TextGenerator for ScriptedGenerator {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.borrow_mut().push(prompt.to_string());
        match self.queue.borrow_mut().pop_front() {
            Some(outcome) => outcome,
            None => self.fallback.clone().ok_or(GenerationError::EmptyResponse),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serves_in_order_then_fallback() {
        let generator = ScriptedGenerator::new()
            .with_response("one")
            .with_response("two")
            .with_fallback("again");

        assert_eq!(generator.generate("a").unwrap(), "one");
        assert_eq!(generator.generate("b").unwrap(), "two");
        assert_eq!(generator.generate("c").unwrap(), "again");
        assert_eq!(generator.prompts(), vec!["a", "b", "c"]);
    }

    #[test]
    fn exhausted_without_fallback_is_empty_response() {
        let generator = ScriptedGenerator::new();
        assert_eq!(
            generator.generate("x").unwrap_err(),
            GenerationError::EmptyResponse
        );
    }

    #[test]
    fn queued_errors_are_returned() {
        let generator = ScriptedGenerator::new().with_error(GenerationError::Request {
            message: "down".into(),
        });
        assert!(generator.generate("x").is_err());
        assert_eq!(generator.remaining(), 0);
    }
}
