//! Diff/patch application engine for LLM-generated edits.
//!
//! Takes free-form edit text produced by a language model — either
//! SEARCH/REPLACE blocks or a unified diff — and applies it to a document,
//! reporting precisely which edits succeeded, which failed, and why. The
//! engine tolerates inexact input (the model's idea of the surrounding code
//! rarely matches byte-for-byte) while staying deterministic and never
//! silently corrupting content.
//!
//! # Architecture
//!
//! This is a **Layer 2 (Engine)** crate:
//! - Depends on: mend-core (shared types)
//! - Used by: whatever fix loop or harness feeds it edits
//!
//! The engine is a pure, synchronous text transformation: no I/O, no state
//! between calls, no internal retries. Identical inputs always produce an
//! identical [`ApplyOutcome`].
//!
//! # Usage
//!
//! ```rust
//! use mend_patch::{apply_auto, ApplyOptions};
//!
//! let content = "fn add(a, b) {\n  return a - b;\n}\n";
//! let edit = "<<<<<<< SEARCH\n  return a - b;\n=======\n  return a + b;\n>>>>>>> REPLACE\n";
//!
//! let outcome = apply_auto(content, edit, &ApplyOptions::default()).unwrap();
//! assert_eq!(outcome.content, "fn add(a, b) {\n  return a + b;\n}\n");
//! assert_eq!(outcome.blocks_applied, 1);
//! ```

mod detect;
mod lineend;
mod matcher;
mod search_replace;
mod unified;

pub use detect::detect_format;
pub use matcher::{find_match, splice, Match, MatchCandidate};
pub use search_replace::{parse_blocks, EditBlock};
pub use unified::{parse_hunks, Hunk, HunkLine, LineKind};

// Re-export the shared types so callers need only this crate
pub use mend_core::{
    ApplyOptions, ApplyOutcome, EditFormat, FailedUnit, MatchStrategy, PatchError, Result,
};

use lineend::{dominant_line_ending, normalize, restore};

/// Detect the dialect of `edit_text` and apply it to `content`.
///
/// Structural failures (unparseable edit text, unknown format) return an
/// error; per-unit match failures are reported inside the [`ApplyOutcome`].
pub fn apply_auto(content: &str, edit_text: &str, options: &ApplyOptions) -> Result<ApplyOutcome> {
    let format = detect::detect_format(edit_text)?;
    apply_with_format(content, edit_text, format, options)
}

/// Apply `edit_text` as the given dialect, skipping detection.
///
/// Both dialects return the identical outcome shape, so callers never
/// branch on format.
pub fn apply_with_format(
    content: &str,
    edit_text: &str,
    format: EditFormat,
    options: &ApplyOptions,
) -> Result<ApplyOutcome> {
    // Work on \n internally; put the document's dominant ending back on the
    // way out
    let ending = dominant_line_ending(content);
    let normalized_content = normalize(content);
    let normalized_edit = normalize(edit_text);

    let mut outcome = match format {
        EditFormat::SearchReplace => {
            let blocks = search_replace::parse_blocks(&normalized_edit)?;
            search_replace::apply_blocks(&normalized_content, &blocks, options)
        }
        EditFormat::Unified => {
            let (hunks, parse_warnings) = unified::parse_hunks(&normalized_edit)?;
            let mut outcome = unified::apply_hunks(&normalized_content, &hunks, options);
            let mut warnings = parse_warnings;
            warnings.append(&mut outcome.warnings);
            outcome.warnings = warnings;
            outcome
        }
    };

    outcome.content = restore(outcome.content, ending);
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_auto_routes_search_replace() {
        let content = "alpha\n";
        let edit = "<<<<<<< SEARCH\nalpha\n=======\nbeta\n>>>>>>> REPLACE\n";
        let outcome = apply_auto(content, edit, &ApplyOptions::default()).unwrap();
        assert_eq!(outcome.content, "beta\n");
    }

    #[test]
    fn test_apply_auto_routes_unified() {
        let content = "alpha\n";
        let edit = "@@ -1,1 +1,1 @@\n-alpha\n+beta\n";
        let outcome = apply_auto(content, edit, &ApplyOptions::default()).unwrap();
        assert_eq!(outcome.content, "beta\n");
    }

    #[test]
    fn test_apply_auto_unknown_format_is_fatal() {
        let err = apply_auto("alpha\n", "no markers here\n", &ApplyOptions::default());
        assert_eq!(err, Err(PatchError::UnknownFormat));
    }

    #[test]
    fn test_crlf_content_keeps_crlf() {
        let content = "alpha\r\nbeta\r\n";
        let edit = "<<<<<<< SEARCH\nalpha\n=======\nALPHA\n>>>>>>> REPLACE\n";
        let outcome = apply_auto(content, edit, &ApplyOptions::default()).unwrap();
        assert_eq!(outcome.content, "ALPHA\r\nbeta\r\n");
    }

    #[test]
    fn test_crlf_edit_text_against_lf_content() {
        let content = "alpha\nbeta\n";
        let edit = "<<<<<<< SEARCH\r\nalpha\r\n=======\r\nALPHA\r\n>>>>>>> REPLACE\r\n";
        let outcome = apply_auto(content, edit, &ApplyOptions::default()).unwrap();
        assert_eq!(outcome.content, "ALPHA\nbeta\n");
    }

    #[test]
    fn test_parse_warnings_surface_through_facade() {
        let content = "a\nb\nc\n";
        // Header overclaims the original line count
        let edit = "@@ -1,9 +1,9 @@\n-a\n+A\n";
        let outcome = apply_auto(content, edit, &ApplyOptions::default()).unwrap();
        assert!(outcome.warnings.iter().any(|w| w.contains("header declares")));
        assert_eq!(outcome.blocks_applied, 1);
    }
}
