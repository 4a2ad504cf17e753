//! Compile errors.

use crate::combinator::Failure;
use crate::diagnostics::{format_context, format_detailed};
use thiserror::Error;

/// Input that is not valid view syntax.
///
/// Carries the raw failure along with both rendered reports so callers can
/// print the message as-is or build their own diagnostic from the position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid Moon view syntax.\n{detailed}\n\nContext:\n{context}")]
pub struct CompileError {
    pub failure: Failure,
    /// Summary line with the offending line and a caret.
    pub detailed: String,
    /// Surrounding lines with a numbered gutter.
    pub context: String,
}

impl CompileError {
    /// Render the reports for a failure in `input`.
    pub fn new(input: &str, failure: Failure) -> Self {
        let detailed = format_detailed(input, failure.position, &failure.expected);
        let context = format_context(input, failure.position);
        Self {
            failure,
            detailed,
            context,
        }
    }

    /// Byte offset of the failure.
    pub fn position(&self) -> usize {
        self.failure.position
    }

    /// What the parser expected to find.
    pub fn expected(&self) -> &str {
        &self.failure.expected
    }
}
