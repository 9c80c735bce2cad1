//! Error types for edit parsing and application.
//!
//! Only structural failures are errors: edit text that cannot be parsed, or
//! edit text that matches neither dialect. "Could not find this block's
//! target" is an expected outcome for LLM-generated edits and is reported as
//! a [`FailedUnit`](crate::outcome::FailedUnit) inside the outcome, never as
//! an error.

use thiserror::Error;

/// Errors that abort a whole apply call before any unit is attempted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PatchError {
    /// Edit text is structurally invalid for its dialect (unterminated
    /// block, malformed hunk header). No units could be reliably
    /// identified, so no partial results are returned.
    #[error("parse error in block {block_index}: {message}")]
    Parse {
        /// 0-based index of the block or hunk where parsing failed
        block_index: usize,
        /// Details about the structural problem
        message: String,
    },

    /// Edit text matches neither dialect's signature.
    #[error("edit text matches neither the search/replace nor the unified diff format")]
    UnknownFormat,
}

/// Result type for edit application.
pub type Result<T> = std::result::Result<T, PatchError>;
