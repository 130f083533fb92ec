//! Output verbosity.

use serde::{Deserialize, Serialize};

/// How much a run prints.
///
/// Errors and warnings are printed in every mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Also print the code each step produced.
    Verbose,
    #[default]
    Normal,
    /// Only warnings and errors.
    Quiet,
}

impl OutputMode {
    /// Whether step summaries include the produced code.
    pub fn shows_code(self) -> bool {
        self == Self::Verbose
    }

    /// Whether headers, messages, successes and spinners are printed.
    pub fn shows_progress(self) -> bool {
        self != Self::Quiet
    }
}
