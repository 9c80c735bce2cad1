//! Locating a search snippet inside content that may have drifted.
//!
//! The matching strategies are a tagged list of pure functions tried in a
//! fixed, caller-configurable order, not a trait hierarchy. The first
//! strategy that yields at least one candidate wins; candidates that tie at
//! the top score resolve to the earliest position in the document so the
//! result is reproducible.

use mend_core::{ApplyOptions, MatchStrategy};
use similar::TextDiff;

/// A located span for a search snippet.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate {
    /// Byte offset of the span in the current content
    pub start: usize,
    /// Byte length of the span
    pub len: usize,
    /// Strategy that produced this candidate
    pub strategy: MatchStrategy,
    /// Confidence in [0, 1]; 1.0 for all non-fuzzy strategies
    pub confidence: f32,
}

/// The winning candidate plus how many candidates shared its score.
///
/// `tied > 1` means the earliest-position tie-break fired and the caller
/// should record an ambiguity warning.
#[derive(Debug, Clone)]
pub struct Match {
    pub candidate: MatchCandidate,
    pub tied: usize,
}

/// Run the strategy chain from `options` until one strategy finds the
/// search text. Returns `None` when every configured strategy comes up
/// empty.
pub fn find_match(content: &str, search: &str, options: &ApplyOptions) -> Option<Match> {
    if search.is_empty() {
        return None;
    }

    let index = LineIndex::new(content);
    let search_lines = split_search_lines(search);

    for strategy in &options.strategies {
        let found = match strategy {
            MatchStrategy::Exact => exact_candidates(content, search),
            MatchStrategy::LineTrimmed => {
                window_candidates(&index, content, &search_lines, MatchStrategy::LineTrimmed, |l| {
                    l.trim().to_string()
                })
            }
            MatchStrategy::WhitespaceNormalized => window_candidates(
                &index,
                content,
                &search_lines,
                MatchStrategy::WhitespaceNormalized,
                collapse_whitespace,
            ),
            MatchStrategy::IndentationAgnostic => {
                dedented_candidates(&index, content, &search_lines)
            }
            MatchStrategy::Fuzzy => {
                fuzzy_candidates(&index, content, &search_lines, options.fuzzy_threshold)
            }
        };

        if let Some(m) = pick_best(found) {
            return Some(m);
        }
    }

    None
}

/// Splice `replace_text` over a located span, producing the new content.
///
/// Exact matches splice the replacement verbatim. Line-based matches cover
/// whole lines, so the replacement's trailing newline is adjusted to match
/// the span, and indentation-agnostic matches are re-indented to the
/// matched region's leading whitespace.
pub fn splice(content: &str, m: &MatchCandidate, replace_text: &str) -> String {
    let before = &content[..m.start];
    let after = &content[m.start + m.len..];

    if m.strategy == MatchStrategy::Exact {
        return format!("{}{}{}", before, replace_text, after);
    }

    let span = &content[m.start..m.start + m.len];
    let span_ends_with_newline = span.ends_with('\n');

    let mut replacement = if m.strategy == MatchStrategy::IndentationAgnostic {
        let span_lines: Vec<&str> = span.lines().collect();
        reindent(replace_text, &leading_indent(&span_lines))
    } else {
        replace_text.to_string()
    };

    if span_ends_with_newline {
        if !replacement.is_empty() && !replacement.ends_with('\n') {
            replacement.push('\n');
        }
    } else if replacement.ends_with('\n') {
        replacement.pop();
    }

    format!("{}{}{}", before, replacement, after)
}

// ============================================================================
// Line bookkeeping
// ============================================================================

/// Content split into lines with their byte offsets, so line-window matches
/// can be converted back into byte spans.
struct LineIndex<'a> {
    lines: Vec<&'a str>,
    starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(content: &'a str) -> Self {
        let mut lines = Vec::new();
        let mut starts = Vec::new();
        let mut offset = 0;
        for segment in content.split_inclusive('\n') {
            starts.push(offset);
            lines.push(segment.strip_suffix('\n').unwrap_or(segment));
            offset += segment.len();
        }
        Self { lines, starts }
    }

    /// Byte span of the window of `count` lines starting at line `at`,
    /// including the window's trailing newline when the content has one.
    fn span(&self, content: &str, at: usize, count: usize) -> (usize, usize) {
        let start = self.starts[at];
        let last = at + count - 1;
        let mut end = self.starts[last] + self.lines[last].len();
        if content[end..].starts_with('\n') {
            end += 1;
        }
        (start, end)
    }
}

/// Search text as a line sequence. A trailing newline marks the end of the
/// last line rather than introducing an empty extra line.
fn split_search_lines(search: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = search.split('\n').collect();
    if lines.len() > 1 && lines.last() == Some(&"") {
        lines.pop();
    }
    lines
}

// ============================================================================
// Strategies
// ============================================================================

fn exact_candidates(content: &str, search: &str) -> Vec<MatchCandidate> {
    content
        .match_indices(search)
        .map(|(start, _)| MatchCandidate {
            start,
            len: search.len(),
            strategy: MatchStrategy::Exact,
            confidence: 1.0,
        })
        .collect()
}

/// Generic whole-line window scan with a per-line normalization function.
fn window_candidates<F>(
    index: &LineIndex<'_>,
    content: &str,
    search_lines: &[&str],
    strategy: MatchStrategy,
    normalize: F,
) -> Vec<MatchCandidate>
where
    F: Fn(&str) -> String,
{
    let window = search_lines.len();
    if window == 0 || index.lines.len() < window {
        return Vec::new();
    }

    let search_key: Vec<String> = search_lines.iter().map(|l| normalize(l)).collect();
    let content_key: Vec<String> = index.lines.iter().map(|l| normalize(l)).collect();

    let mut candidates = Vec::new();
    for at in 0..=index.lines.len() - window {
        if content_key[at..at + window] == search_key[..] {
            let (start, end) = index.span(content, at, window);
            candidates.push(MatchCandidate {
                start,
                len: end - start,
                strategy,
                confidence: 1.0,
            });
        }
    }
    candidates
}

fn collapse_whitespace(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Indentation-agnostic matching: both sides are stripped of their common
/// leading indentation before comparison, so relative structure survives
/// while the absolute indent level is ignored.
fn dedented_candidates(
    index: &LineIndex<'_>,
    content: &str,
    search_lines: &[&str],
) -> Vec<MatchCandidate> {
    let window = search_lines.len();
    if window == 0 || index.lines.len() < window {
        return Vec::new();
    }

    let search_key = dedent(search_lines);

    let mut candidates = Vec::new();
    for at in 0..=index.lines.len() - window {
        if dedent(&index.lines[at..at + window]) == search_key {
            let (start, end) = index.span(content, at, window);
            candidates.push(MatchCandidate {
                start,
                len: end - start,
                strategy: MatchStrategy::IndentationAgnostic,
                confidence: 1.0,
            });
        }
    }
    candidates
}

/// Sliding-window fuzzy scan. The window is keyed to line boundaries and
/// sized by the search text, which bounds comparison cost relative to the
/// search length rather than the document length.
fn fuzzy_candidates(
    index: &LineIndex<'_>,
    content: &str,
    search_lines: &[&str],
    threshold: f32,
) -> Vec<MatchCandidate> {
    let window = search_lines.len();
    if window == 0 || index.lines.len() < window {
        return Vec::new();
    }

    let search_text = search_lines.join("\n");

    let mut candidates = Vec::new();
    for at in 0..=index.lines.len() - window {
        let window_text = index.lines[at..at + window].join("\n");
        let similarity = TextDiff::from_chars(search_text.as_str(), window_text.as_str()).ratio();
        if similarity >= threshold {
            let (start, end) = index.span(content, at, window);
            candidates.push(MatchCandidate {
                start,
                len: end - start,
                strategy: MatchStrategy::Fuzzy,
                confidence: similarity,
            });
        }
    }
    candidates
}

/// Select the top-scoring candidate, breaking ties by earliest position.
fn pick_best(candidates: Vec<MatchCandidate>) -> Option<Match> {
    let best_score = candidates
        .iter()
        .map(|c| c.confidence)
        .fold(f32::NEG_INFINITY, f32::max);

    let mut tied = 0;
    let mut winner: Option<MatchCandidate> = None;
    // Candidates arrive in document order, so the first at the top score is
    // the earliest position.
    for candidate in candidates {
        if candidate.confidence == best_score {
            tied += 1;
            if winner.is_none() {
                winner = Some(candidate);
            }
        }
    }

    winner.map(|candidate| Match { candidate, tied })
}

// ============================================================================
// Indentation helpers
// ============================================================================

/// Common leading whitespace of the non-empty lines, as a string.
fn leading_indent(lines: &[&str]) -> String {
    let mut common: Option<&str> = None;
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let ws_len = line.len() - line.trim_start().len();
        let indent = &line[..ws_len];
        common = Some(match common {
            None => indent,
            Some(prev) => {
                let shared = prev
                    .char_indices()
                    .zip(indent.chars())
                    .take_while(|((_, a), b)| a == b)
                    .count();
                let byte_end = prev
                    .char_indices()
                    .nth(shared)
                    .map(|(i, _)| i)
                    .unwrap_or(prev.len());
                &prev[..byte_end]
            }
        });
    }
    common.unwrap_or("").to_string()
}

/// Strip the common leading indentation from every line; empty lines stay
/// empty.
fn dedent(lines: &[&str]) -> Vec<String> {
    let indent = leading_indent(lines);
    lines
        .iter()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                line.strip_prefix(indent.as_str()).unwrap_or(line).to_string()
            }
        })
        .collect()
}

/// Re-indent `text` to sit at `indent`: its own common indentation is
/// removed and `indent` is prefixed to every non-empty line.
fn reindent(text: &str, indent: &str) -> String {
    let lines = split_search_lines(text);
    let dedented = dedent(&lines);
    let mut out: Vec<String> = dedented
        .iter()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{}{}", indent, line)
            }
        })
        .collect();
    if text.ends_with('\n') {
        out.push(String::new());
    }
    out.join("\n")
}
