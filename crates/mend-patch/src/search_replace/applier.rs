//! Applies parsed SEARCH/REPLACE blocks with flexible matching.

use crate::matcher::{self, Match};
use crate::search_replace::EditBlock;
use mend_core::{ApplyOptions, ApplyOutcome, FailedUnit, MatchStrategy};
use tracing::debug;

/// Apply `blocks` to `original` in source order.
///
/// Each block is matched against the content produced by the blocks before
/// it, never against the original document. Lenient mode keeps going past
/// failures; strict mode aborts on the first failure and returns the
/// original content untouched with every block counted as failed.
pub fn apply_blocks(original: &str, blocks: &[EditBlock], options: &ApplyOptions) -> ApplyOutcome {
    let mut current = original.to_string();
    let mut applied = 0usize;
    let mut failed_units: Vec<FailedUnit> = Vec::new();
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    for block in blocks {
        match matcher::find_match(&current, &block.search_text, options) {
            Some(Match { candidate, tied }) => {
                if tied > 1 {
                    warnings.push(format!(
                        "block {}: {} equally good matches; applied the earliest (offset {})",
                        block.index, tied, candidate.start
                    ));
                }
                if options.enable_telemetry {
                    debug!(
                        block = block.index,
                        strategy = %candidate.strategy,
                        confidence = candidate.confidence,
                        "block applied"
                    );
                }
                current = matcher::splice(&current, &candidate, &block.replace_text);
                applied += 1;
            }
            None => {
                let reason = no_match_reason(&options.strategies);
                if options.strict {
                    return strict_abort(original, blocks, block.index, &reason, warnings);
                }
                errors.push(format!("block {}: {}", block.index, reason));
                failed_units.push(FailedUnit::new(block.index, reason, &block.search_text));
            }
        }
    }

    ApplyOutcome {
        content: current,
        blocks_total: blocks.len(),
        blocks_applied: applied,
        blocks_failed: failed_units.len(),
        failed_units,
        errors,
        warnings,
    }
}

fn no_match_reason(strategies: &[MatchStrategy]) -> String {
    let tried: Vec<String> = strategies.iter().map(|s| s.to_string()).collect();
    format!(
        "no match found for search text (strategies tried: {})",
        tried.join(", ")
    )
}

/// All-or-nothing failure: the returned content is the unmodified original
/// and every block, including ones that had already applied, counts as
/// failed.
fn strict_abort(
    original: &str,
    blocks: &[EditBlock],
    failing_index: usize,
    reason: &str,
    warnings: Vec<String>,
) -> ApplyOutcome {
    let mut failed_units = Vec::with_capacity(blocks.len());
    for block in blocks {
        let unit_reason = if block.index == failing_index {
            reason.to_string()
        } else if block.index < failing_index {
            format!("rolled back: strict mode aborted at block {}", failing_index)
        } else {
            format!("not attempted: strict mode aborted at block {}", failing_index)
        };
        failed_units.push(FailedUnit::new(block.index, unit_reason, &block.search_text));
    }

    ApplyOutcome {
        content: original.to_string(),
        blocks_total: blocks.len(),
        blocks_applied: 0,
        blocks_failed: blocks.len(),
        failed_units,
        errors: vec![format!(
            "block {}: {}; strict mode: no changes applied",
            failing_index, reason
        )],
        warnings,
    }
}
