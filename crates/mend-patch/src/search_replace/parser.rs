//! Parser for SEARCH/REPLACE edit blocks.
//!
//! Grammar: one or more blocks, each delimited by a start marker, a divider,
//! and an end marker in that fixed order:
//!
//! ```text
//! <<<<<<< SEARCH
//! text to find
//! =======
//! replacement text
//! >>>>>>> REPLACE
//! ```
//!
//! Text between markers is captured exactly; prose outside blocks (LLMs like
//! to narrate around their edits) is ignored. A block missing its divider or
//! end marker aborts the whole parse — no partial block lists are returned.

use mend_core::{PatchError, Result};
use regex::Regex;
use std::sync::LazyLock;

pub(crate) static SEARCH_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<{7,}\s*SEARCH\s*$").expect("Invalid search marker regex"));

pub(crate) static DIVIDER_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^={7,}\s*$").expect("Invalid divider marker regex"));

pub(crate) static REPLACE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^>{7,}\s*REPLACE\s*$").expect("Invalid replace marker regex"));

/// One parsed search/replace edit unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBlock {
    /// 0-based order of appearance in the edit text
    pub index: usize,
    /// Exact text to locate, as captured between the markers
    pub search_text: String,
    /// Exact text to splice in
    pub replace_text: String,
}

/// Parse every block out of `edit_text`, in order of appearance.
pub fn parse_blocks(edit_text: &str) -> Result<Vec<EditBlock>> {
    let lines: Vec<&str> = edit_text.lines().collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if SEARCH_MARKER.is_match(lines[i]) {
            let block_index = blocks.len();
            i += 1;

            let mut search = Vec::new();
            loop {
                match lines.get(i) {
                    None => {
                        return Err(PatchError::Parse {
                            block_index,
                            message: "unterminated block: missing ======= divider".to_string(),
                        })
                    }
                    Some(line) if DIVIDER_MARKER.is_match(line) => break,
                    Some(line)
                        if SEARCH_MARKER.is_match(line) || REPLACE_MARKER.is_match(line) =>
                    {
                        return Err(PatchError::Parse {
                            block_index,
                            message: format!("expected ======= divider, found marker {:?}", line),
                        })
                    }
                    Some(line) => {
                        search.push(*line);
                        i += 1;
                    }
                }
            }
            i += 1; // past the divider

            let mut replace = Vec::new();
            loop {
                match lines.get(i) {
                    None => {
                        return Err(PatchError::Parse {
                            block_index,
                            message: "unterminated block: missing >>>>>>> REPLACE end marker"
                                .to_string(),
                        })
                    }
                    Some(line) if REPLACE_MARKER.is_match(line) => break,
                    Some(line)
                        if SEARCH_MARKER.is_match(line) || DIVIDER_MARKER.is_match(line) =>
                    {
                        return Err(PatchError::Parse {
                            block_index,
                            message: format!(
                                "expected >>>>>>> REPLACE end marker, found marker {:?}",
                                line
                            ),
                        })
                    }
                    Some(line) => {
                        replace.push(*line);
                        i += 1;
                    }
                }
            }
            i += 1; // past the end marker

            blocks.push(EditBlock {
                index: block_index,
                search_text: section_text(&search),
                replace_text: section_text(&replace),
            });
        } else if DIVIDER_MARKER.is_match(lines[i]) || REPLACE_MARKER.is_match(lines[i]) {
            return Err(PatchError::Parse {
                block_index: blocks.len(),
                message: format!("marker {:?} outside of a block", lines[i]),
            });
        } else {
            i += 1;
        }
    }

    if blocks.is_empty() {
        return Err(PatchError::Parse {
            block_index: 0,
            message: "no search/replace blocks found".to_string(),
        });
    }

    Ok(blocks)
}

/// Section lines back to text. Non-empty sections keep their final newline,
/// since the captured text ran up to the following marker line.
fn section_text(lines: &[&str]) -> String {
    if lines.is_empty() {
        String::new()
    } else {
        let mut text = lines.join("\n");
        text.push('\n');
        text
    }
}
