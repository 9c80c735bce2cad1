//! Per-call configuration for the edit application engine.
//!
//! Nothing here is process-wide: every knob is passed explicitly per call,
//! so concurrent callers with different settings never interfere.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default similarity threshold for fuzzy matching (80%)
pub const DEFAULT_FUZZY_THRESHOLD: f32 = 0.8;

/// Default number of mismatched context lines tolerated when anchoring a
/// unified hunk away from its declared position.
pub const DEFAULT_HUNK_FUZZ: usize = 2;

/// The two edit-description dialects the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditFormat {
    /// SEARCH/REPLACE marker blocks
    SearchReplace,
    /// Unified diff hunks
    Unified,
}

impl fmt::Display for EditFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditFormat::SearchReplace => write!(f, "search/replace"),
            EditFormat::Unified => write!(f, "unified diff"),
        }
    }
}

/// One matching strategy in the fallback chain.
///
/// Strategies are tried in the order they appear in
/// [`ApplyOptions::strategies`]; the first one that yields at least one
/// candidate wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Literal substring match
    Exact,
    /// Match after trimming leading/trailing whitespace per line
    LineTrimmed,
    /// Match after collapsing whitespace runs to single spaces
    WhitespaceNormalized,
    /// Match after removing leading indentation from every line
    IndentationAgnostic,
    /// Sliding-window similarity match, accepted above a threshold
    Fuzzy,
}

impl MatchStrategy {
    /// The default chain, from cheapest/most-precise to most tolerant.
    pub fn default_chain() -> Vec<MatchStrategy> {
        vec![
            MatchStrategy::Exact,
            MatchStrategy::LineTrimmed,
            MatchStrategy::WhitespaceNormalized,
            MatchStrategy::IndentationAgnostic,
            MatchStrategy::Fuzzy,
        ]
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatchStrategy::Exact => "exact",
            MatchStrategy::LineTrimmed => "line_trimmed",
            MatchStrategy::WhitespaceNormalized => "whitespace_normalized",
            MatchStrategy::IndentationAgnostic => "indentation_agnostic",
            MatchStrategy::Fuzzy => "fuzzy",
        };
        write!(f, "{}", name)
    }
}

/// Per-call options for edit application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplyOptions {
    /// All-or-nothing mode: on the first failed unit the call returns the
    /// original content unmodified and counts every unit as failed.
    pub strict: bool,
    /// Emit a tracing event per applied unit recording which strategy
    /// matched and at what confidence.
    pub enable_telemetry: bool,
    /// Matching strategies to try, in order.
    pub strategies: Vec<MatchStrategy>,
    /// Minimum similarity for the fuzzy strategy to accept a candidate.
    pub fuzzy_threshold: f32,
    /// Mismatched context lines tolerated when anchoring a unified hunk.
    pub hunk_fuzz: usize,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            strict: false,
            enable_telemetry: false,
            strategies: MatchStrategy::default_chain(),
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            hunk_fuzz: DEFAULT_HUNK_FUZZ,
        }
    }
}

impl ApplyOptions {
    /// Lenient defaults with strict mode switched on.
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_chain_order() {
        let chain = MatchStrategy::default_chain();
        assert_eq!(chain.first(), Some(&MatchStrategy::Exact));
        assert_eq!(chain.last(), Some(&MatchStrategy::Fuzzy));
        assert_eq!(chain.len(), 5);
    }

    #[test]
    fn test_default_options() {
        let opts = ApplyOptions::default();
        assert!(!opts.strict);
        assert!(!opts.enable_telemetry);
        assert_eq!(opts.fuzzy_threshold, DEFAULT_FUZZY_THRESHOLD);
        assert_eq!(opts.hunk_fuzz, DEFAULT_HUNK_FUZZ);
    }

    #[test]
    fn test_options_roundtrip_serde() {
        let opts = ApplyOptions::strict();
        let json = serde_json::to_string(&opts).unwrap();
        let back: ApplyOptions = serde_json::from_str(&json).unwrap();
        assert!(back.strict);
        assert_eq!(back.strategies, opts.strategies);
    }

    #[test]
    fn test_partial_options_deserialize() {
        // Callers may pass just the knobs they care about
        let opts: ApplyOptions = serde_json::from_str(r#"{"strict": true}"#).unwrap();
        assert!(opts.strict);
        assert_eq!(opts.strategies, MatchStrategy::default_chain());
    }
}
