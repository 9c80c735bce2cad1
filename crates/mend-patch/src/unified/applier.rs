//! Applies parsed hunks with positional anchoring and bounded fuzz.
//!
//! Each hunk is first tried at its declared line number (adjusted for the
//! drift earlier hunks introduced), then at nearby positions, then anywhere
//! in the document. Context lines tolerate up to `hunk_fuzz` mismatches;
//! remove lines must always match, since deleting the wrong line would
//! corrupt content.

use crate::unified::{Hunk, LineKind};
use mend_core::{ApplyOptions, ApplyOutcome, FailedUnit};
use tracing::debug;

/// Minimum radius (in lines) searched around the declared position before
/// falling back to a whole-document scan.
const MIN_SEARCH_RADIUS: usize = 15;

/// Radius grows with hunk size so large hunks get a proportionate search.
const SEARCH_RADIUS_FACTOR: usize = 2;

/// Apply `hunks` to `original` in source order.
///
/// Later hunks see the content produced by earlier ones; declared line
/// numbers are adjusted by the running line-count delta. Lenient/strict
/// behavior matches the search/replace applier.
pub fn apply_hunks(original: &str, hunks: &[Hunk], options: &ApplyOptions) -> ApplyOutcome {
    let trailing_newline = original.ends_with('\n');
    let mut lines: Vec<String> = if original.is_empty() {
        Vec::new()
    } else {
        let mut split: Vec<String> = original.split('\n').map(|s| s.to_string()).collect();
        if trailing_newline {
            split.pop();
        }
        split
    };

    let mut delta: i64 = 0;
    let mut applied = 0usize;
    let mut failed_units: Vec<FailedUnit> = Vec::new();
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    for hunk in hunks {
        let old: Vec<(&str, LineKind)> = hunk
            .lines
            .iter()
            .filter(|l| l.kind != LineKind::Add)
            .map(|l| (l.text.as_str(), l.kind))
            .collect();

        if old.is_empty() {
            // Pure insertion: anchor directly at the declared position
            let at = clamp_position(hunk.original_start as i64 + delta, lines.len());
            let added: Vec<String> = hunk
                .lines
                .iter()
                .filter(|l| l.kind == LineKind::Add)
                .map(|l| l.text.clone())
                .collect();
            let added_count = added.len() as i64;
            lines.splice(at..at, added);
            delta += added_count;
            applied += 1;
            if options.enable_telemetry {
                debug!(hunk = hunk.index, line = at, "pure insertion applied");
            }
            continue;
        }

        let guess = clamp_position(hunk.original_start as i64 - 1 + delta, lines.len());
        match find_anchor(&lines, &old, guess, options.hunk_fuzz) {
            Some(anchor) => {
                if anchor.mismatches > 0 {
                    warnings.push(format!(
                        "hunk {}: anchored at line {} with {} mismatched context line(s)",
                        hunk.index,
                        anchor.position + 1,
                        anchor.mismatches
                    ));
                }
                if options.enable_telemetry {
                    debug!(
                        hunk = hunk.index,
                        line = anchor.position,
                        drift = anchor.position as i64 - (hunk.original_start as i64 - 1),
                        fuzz = anchor.mismatches,
                        "hunk applied"
                    );
                }
                let replacement = rebuild_window(&lines, anchor.position, hunk);
                let new_len = replacement.len() as i64;
                lines.splice(anchor.position..anchor.position + old.len(), replacement);
                delta += new_len - old.len() as i64;
                applied += 1;
            }
            None => {
                let reason = format!(
                    "could not anchor hunk near line {} (fuzz tolerance {})",
                    hunk.original_start, options.hunk_fuzz
                );
                let old_text: Vec<&str> = old.iter().map(|(text, _)| *text).collect();
                if options.strict {
                    return strict_abort(original, hunks, hunk.index, &reason, warnings);
                }
                errors.push(format!("hunk {}: {}", hunk.index, reason));
                failed_units.push(FailedUnit::new(hunk.index, reason, &old_text.join("\n")));
            }
        }
    }

    let mut content = lines.join("\n");
    if trailing_newline && !content.is_empty() {
        content.push('\n');
    }

    ApplyOutcome {
        content,
        blocks_total: hunks.len(),
        blocks_applied: applied,
        blocks_failed: failed_units.len(),
        failed_units,
        errors,
        warnings,
    }
}

struct Anchor {
    position: usize,
    mismatches: usize,
}

/// Find the first position whose window matches the hunk's original side.
///
/// Candidate positions are tried in a deterministic ladder: the declared
/// position, then alternating outward within a radius, then the whole
/// document left to right. Each ladder runs once requiring a perfect match
/// and once allowing up to `fuzz` mismatched context lines, so a clean
/// anchor elsewhere always beats a fuzzy one nearby.
fn find_anchor(lines: &[String], old: &[(&str, LineKind)], guess: usize, fuzz: usize) -> Option<Anchor> {
    if lines.len() < old.len() {
        return None;
    }
    let max_start = lines.len() - old.len();
    let order = candidate_order(guess.min(max_start), max_start, old.len());

    for allowed in [0, fuzz] {
        for &position in &order {
            if let Some(mismatches) = window_mismatches(lines, old, position, allowed) {
                return Some(Anchor { position, mismatches });
            }
        }
        if fuzz == 0 {
            break;
        }
    }
    None
}

/// Declared position first, then ±1, ±2, ... within the radius, then every
/// remaining position in document order.
fn candidate_order(guess: usize, max_start: usize, window: usize) -> Vec<usize> {
    let radius = (window * SEARCH_RADIUS_FACTOR).max(MIN_SEARCH_RADIUS);
    let mut seen = vec![false; max_start + 1];
    let mut order = Vec::with_capacity(max_start + 1);

    let mut push = |pos: usize, seen: &mut Vec<bool>, order: &mut Vec<usize>| {
        if pos <= max_start && !seen[pos] {
            seen[pos] = true;
            order.push(pos);
        }
    };

    push(guess, &mut seen, &mut order);
    for d in 1..=radius {
        if let Some(below) = guess.checked_sub(d) {
            push(below, &mut seen, &mut order);
        }
        push(guess + d, &mut seen, &mut order);
    }
    for pos in 0..=max_start {
        push(pos, &mut seen, &mut order);
    }
    order
}

/// Mismatch count for the window at `position`, or `None` when the window
/// does not qualify. Remove lines must match exactly (modulo trailing
/// whitespace); context lines may mismatch up to `allowed` times.
fn window_mismatches(
    lines: &[String],
    old: &[(&str, LineKind)],
    position: usize,
    allowed: usize,
) -> Option<usize> {
    let mut mismatches = 0;
    for (offset, (expected, kind)) in old.iter().enumerate() {
        let actual = lines[position + offset].as_str();
        if actual.trim_end() == expected.trim_end() {
            continue;
        }
        if *kind == LineKind::Remove {
            return None;
        }
        mismatches += 1;
        if mismatches > allowed {
            return None;
        }
    }
    Some(mismatches)
}

/// Build the post-edit window: context lines keep the document's actual
/// text (it may differ within fuzz tolerance), remove lines are dropped,
/// add lines come from the hunk.
fn rebuild_window(lines: &[String], position: usize, hunk: &Hunk) -> Vec<String> {
    let mut out = Vec::new();
    let mut cursor = position;
    for line in &hunk.lines {
        match line.kind {
            LineKind::Context => {
                out.push(lines[cursor].clone());
                cursor += 1;
            }
            LineKind::Remove => {
                cursor += 1;
            }
            LineKind::Add => {
                out.push(line.text.clone());
            }
        }
    }
    out
}

fn clamp_position(position: i64, len: usize) -> usize {
    position.clamp(0, len as i64) as usize
}

fn strict_abort(
    original: &str,
    hunks: &[Hunk],
    failing_index: usize,
    reason: &str,
    warnings: Vec<String>,
) -> ApplyOutcome {
    let mut failed_units = Vec::with_capacity(hunks.len());
    for hunk in hunks {
        let unit_reason = if hunk.index == failing_index {
            reason.to_string()
        } else if hunk.index < failing_index {
            format!("rolled back: strict mode aborted at hunk {}", failing_index)
        } else {
            format!("not attempted: strict mode aborted at hunk {}", failing_index)
        };
        let old_text: Vec<&str> = hunk.old_lines();
        failed_units.push(FailedUnit::new(hunk.index, unit_reason, &old_text.join("\n")));
    }

    ApplyOutcome {
        content: original.to_string(),
        blocks_total: hunks.len(),
        blocks_applied: 0,
        blocks_failed: hunks.len(),
        failed_units,
        errors: vec![format!(
            "hunk {}: {}; strict mode: no changes applied",
            failing_index, reason
        )],
        warnings,
    }
}
