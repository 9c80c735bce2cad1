//! Parser for unified diff hunks.
//!
//! Accepts the loose unified diffs LLMs produce: file headers are optional,
//! hunk headers may omit counts, and a header whose declared counts disagree
//! with the body is a warning rather than an error — drifted headers are
//! routine when the model's view of the file is stale. Only a hunk header
//! that cannot be parsed at all is fatal.

use mend_core::{PatchError, Result};
use regex::Regex;
use std::sync::LazyLock;

pub(crate) static HUNK_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@@\s*-(\d+)(?:,(\d+))?\s+\+(\d+)(?:,(\d+))?\s*@@").expect("Invalid hunk header regex")
});

/// File header or diff-tool preamble line (`--- a/...`, `+++ b/...`, ...).
pub(crate) fn looks_like_file_header(line: &str) -> bool {
    line.starts_with("--- ")
        || line.starts_with("+++ ")
        || line.starts_with("diff ")
        || line.starts_with("index ")
}

/// Tag of one hunk body line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Unchanged line, present in both sides
    Context,
    /// Line added by the edit
    Add,
    /// Line removed by the edit
    Remove,
}

/// One tagged line of a hunk body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HunkLine {
    pub kind: LineKind,
    pub text: String,
}

/// One contiguous region of change with its declared line ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    /// 0-based order of appearance in the edit text
    pub index: usize,
    /// 1-based start line in the original document
    pub original_start: usize,
    /// Declared line count on the original side
    pub original_count: usize,
    /// 1-based start line in the new document
    pub new_start: usize,
    /// Declared line count on the new side
    pub new_count: usize,
    /// Body lines in order
    pub lines: Vec<HunkLine>,
}

impl Hunk {
    /// The original-side line sequence (context + remove).
    pub fn old_lines(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|l| l.kind != LineKind::Add)
            .map(|l| l.text.as_str())
            .collect()
    }

    /// The new-side line sequence (context + add).
    pub fn new_lines(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|l| l.kind != LineKind::Remove)
            .map(|l| l.text.as_str())
            .collect()
    }
}

/// Parse every hunk out of `edit_text`.
///
/// Returns the hunks plus non-fatal warnings (header/body count mismatches).
pub fn parse_hunks(edit_text: &str) -> Result<(Vec<Hunk>, Vec<String>)> {
    let mut hunks: Vec<Hunk> = Vec::new();
    let mut current: Option<Hunk> = None;

    for line in edit_text.lines() {
        if looks_like_file_header(line) {
            if let Some(hunk) = current.take() {
                hunks.push(hunk);
            }
            continue;
        }

        if line.starts_with("@@") {
            let caps = HUNK_HEADER.captures(line).ok_or_else(|| PatchError::Parse {
                block_index: hunks.len() + usize::from(current.is_some()),
                message: format!("malformed hunk header {:?}", line),
            })?;
            if let Some(hunk) = current.take() {
                hunks.push(hunk);
            }
            current = Some(Hunk {
                index: hunks.len(),
                original_start: capture_number(&caps, 1, 0),
                original_count: capture_number(&caps, 2, 1),
                new_start: capture_number(&caps, 3, 0),
                new_count: capture_number(&caps, 4, 1),
                lines: Vec::new(),
            });
            continue;
        }

        if current.is_some() {
            match classify_body_line(line) {
                BodyLine::Tagged(hunk_line) => {
                    if let Some(hunk) = current.as_mut() {
                        hunk.lines.push(hunk_line);
                    }
                }
                BodyLine::NoNewlineMarker => {}
                BodyLine::Prose => {
                    // Trailing prose ends the hunk
                    if let Some(done) = current.take() {
                        hunks.push(done);
                    }
                }
            }
        } else if line.starts_with('+') || line.starts_with('-') {
            // An add/remove line with no hunk to belong to cannot be
            // silently dropped; that would lose part of the edit
            return Err(PatchError::Parse {
                block_index: hunks.len(),
                message: format!("tagged diff line {:?} outside of any hunk", line),
            });
        }
    }

    if let Some(hunk) = current.take() {
        hunks.push(hunk);
    }

    if hunks.is_empty() {
        return Err(PatchError::Parse {
            block_index: 0,
            message: "no hunks found".to_string(),
        });
    }

    let warnings = count_mismatch_warnings(&hunks);
    Ok((hunks, warnings))
}

enum BodyLine {
    Tagged(HunkLine),
    NoNewlineMarker,
    Prose,
}

fn classify_body_line(line: &str) -> BodyLine {
    if let Some(text) = line.strip_prefix('+') {
        BodyLine::Tagged(HunkLine {
            kind: LineKind::Add,
            text: text.to_string(),
        })
    } else if let Some(text) = line.strip_prefix('-') {
        BodyLine::Tagged(HunkLine {
            kind: LineKind::Remove,
            text: text.to_string(),
        })
    } else if let Some(text) = line.strip_prefix(' ') {
        BodyLine::Tagged(HunkLine {
            kind: LineKind::Context,
            text: text.to_string(),
        })
    } else if line.is_empty() {
        // LLMs routinely drop the leading space on blank context lines
        BodyLine::Tagged(HunkLine {
            kind: LineKind::Context,
            text: String::new(),
        })
    } else if line.starts_with('\\') {
        // "\ No newline at end of file"
        BodyLine::NoNewlineMarker
    } else {
        BodyLine::Prose
    }
}

fn capture_number(caps: &regex::Captures<'_>, group: usize, default: usize) -> usize {
    caps.get(group)
        .map(|m| m.as_str().parse().unwrap_or(default))
        .unwrap_or(default)
}

/// Validate declared counts against the tagged body lines.
fn count_mismatch_warnings(hunks: &[Hunk]) -> Vec<String> {
    let mut warnings = Vec::new();
    for hunk in hunks {
        let old_actual = hunk.old_lines().len();
        let new_actual = hunk.new_lines().len();
        if old_actual != hunk.original_count || new_actual != hunk.new_count {
            warnings.push(format!(
                "hunk {}: header declares -{},{} +{},{} but body has {} original / {} new lines",
                hunk.index,
                hunk.original_start,
                hunk.original_count,
                hunk.new_start,
                hunk.new_count,
                old_actual,
                new_actual
            ));
        }
    }
    warnings
}
