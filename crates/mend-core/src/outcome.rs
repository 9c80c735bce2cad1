//! The result shape shared by both dialects' appliers.

use serde::{Deserialize, Serialize};

/// Maximum length of the diagnostic snippet carried by a [`FailedUnit`].
pub const SNIPPET_MAX_LEN: usize = 120;

/// One edit unit that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedUnit {
    /// 0-based index of the block or hunk in its edit text
    pub index: usize,
    /// Why the unit failed
    pub reason: String,
    /// Bounded excerpt of the unmatched search text, for diagnostics only
    pub snippet: String,
}

impl FailedUnit {
    /// Build a failed unit, truncating the snippet to [`SNIPPET_MAX_LEN`].
    pub fn new(index: usize, reason: impl Into<String>, search_text: &str) -> Self {
        Self {
            index,
            reason: reason.into(),
            snippet: truncate_snippet(search_text),
        }
    }
}

fn truncate_snippet(text: &str) -> String {
    if text.len() <= SNIPPET_MAX_LEN {
        return text.to_string();
    }
    // Cut on a char boundary at or below the limit
    let mut end = SNIPPET_MAX_LEN;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

/// Aggregated result of applying one edit text to one document.
///
/// This is the sole per-call contract: every unit is accounted for either in
/// `blocks_applied` or in `blocks_failed` (with a matching [`FailedUnit`]),
/// and `content` is always a complete document, never a fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplyOutcome {
    /// The document after applying every unit that matched
    pub content: String,
    /// Number of units parsed from the edit text
    pub blocks_total: usize,
    /// Units successfully applied
    pub blocks_applied: usize,
    /// Units that could not be applied
    pub blocks_failed: usize,
    /// One entry per failed unit, in unit order
    pub failed_units: Vec<FailedUnit>,
    /// Human-readable error lines, one per failed unit
    pub errors: Vec<String>,
    /// Non-fatal notes (ambiguous matches, header count mismatches)
    pub warnings: Vec<String>,
}

impl ApplyOutcome {
    /// True when every unit applied.
    pub fn is_full_success(&self) -> bool {
        self.blocks_failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet_short_text_unchanged() {
        let unit = FailedUnit::new(0, "no match", "let x = 1;");
        assert_eq!(unit.snippet, "let x = 1;");
    }

    #[test]
    fn test_snippet_truncated() {
        let long = "a".repeat(500);
        let unit = FailedUnit::new(3, "no match", &long);
        assert!(unit.snippet.len() <= SNIPPET_MAX_LEN + 3);
        assert!(unit.snippet.ends_with("..."));
        assert_eq!(unit.index, 3);
    }

    #[test]
    fn test_snippet_truncation_respects_char_boundary() {
        // Multibyte chars straddling the cut point must not panic
        let long = "é".repeat(200);
        let unit = FailedUnit::new(0, "no match", &long);
        assert!(unit.snippet.ends_with("..."));
    }

    #[test]
    fn test_outcome_serializes() {
        let outcome = ApplyOutcome {
            content: "x".to_string(),
            blocks_total: 1,
            blocks_applied: 1,
            blocks_failed: 0,
            failed_units: vec![],
            errors: vec![],
            warnings: vec![],
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["blocks_total"], 1);
        assert!(outcome.is_full_success());
    }
}
