//! Classifies edit text as one of the two dialects.

use crate::search_replace::{REPLACE_MARKER, SEARCH_MARKER};
use crate::unified::{looks_like_file_header, HUNK_HEADER};
use mend_core::{EditFormat, PatchError, Result};

/// Inspect `edit_text` and classify its dialect.
///
/// Search/replace wins when both a start and an end marker are present;
/// otherwise hunk headers or file headers mean unified. Anything else is
/// fatal — the facade never guesses further.
pub fn detect_format(edit_text: &str) -> Result<EditFormat> {
    let mut has_search = false;
    let mut has_replace = false;
    let mut has_unified = false;

    for line in edit_text.lines() {
        if SEARCH_MARKER.is_match(line) {
            has_search = true;
        } else if REPLACE_MARKER.is_match(line) {
            has_replace = true;
        } else if HUNK_HEADER.is_match(line) || looks_like_file_header(line) {
            has_unified = true;
        }
    }

    if has_search && has_replace {
        Ok(EditFormat::SearchReplace)
    } else if has_unified {
        Ok(EditFormat::Unified)
    } else {
        Err(PatchError::UnknownFormat)
    }
}
