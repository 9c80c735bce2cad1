//! End-to-end tests of the facade entry points across both dialects.

use mend_patch::{
    apply_auto, apply_with_format, find_match, ApplyOptions, EditFormat, MatchStrategy, PatchError,
};

const ADD_FN: &str = "function add(a, b) {\n  return a - b;\n}\n";

// =============================================================================
// Scenario tests
// =============================================================================

#[test]
fn scenario_exact_match_single_block() {
    let edit = "<<<<<<< SEARCH\n  return a - b;\n=======\n  return a + b;\n>>>>>>> REPLACE\n";
    let outcome = apply_auto(ADD_FN, edit, &ApplyOptions::default()).unwrap();
    assert_eq!(outcome.content, "function add(a, b) {\n  return a + b;\n}\n");
    assert_eq!(outcome.blocks_applied, 1);
    assert_eq!(outcome.blocks_failed, 0);
}

#[test]
fn scenario_whitespace_drift_falls_back() {
    // Search differs from the actual line only by trailing whitespace
    let edit = "<<<<<<< SEARCH\n  return a - b;   \n=======\n  return a + b;\n>>>>>>> REPLACE\n";
    let outcome = apply_auto(ADD_FN, edit, &ApplyOptions::default()).unwrap();
    assert_eq!(outcome.content, "function add(a, b) {\n  return a + b;\n}\n");
    assert_eq!(outcome.blocks_applied, 1);

    // Line-trimmed sits earlier in the default chain than
    // whitespace-normalized and already tolerates trailing whitespace, so
    // it is the strategy that resolves this block
    let m = find_match(ADD_FN, "  return a - b;   \n", &ApplyOptions::default()).unwrap();
    assert_eq!(m.candidate.strategy, MatchStrategy::LineTrimmed);
}

#[test]
fn scenario_whitespace_drift_fails_with_exact_only() {
    let edit = "<<<<<<< SEARCH\n  return a - b;   \n=======\n  return a + b;\n>>>>>>> REPLACE\n";
    let opts = ApplyOptions {
        strategies: vec![MatchStrategy::Exact],
        ..ApplyOptions::default()
    };
    let outcome = apply_auto(ADD_FN, edit, &opts).unwrap();
    assert_eq!(outcome.content, ADD_FN);
    assert_eq!(outcome.blocks_failed, 1);
    assert_eq!(outcome.failed_units.len(), 1);
    assert!(!outcome.errors.is_empty());
}

#[test]
fn scenario_unified_hunk_with_drifted_position() {
    // One extra blank line above what the hunk header assumes
    let content = "\nfunction add(a, b) {\n  return a - b;\n}\n";
    let edit = "\
--- a/add.js
+++ b/add.js
@@ -1,3 +1,3 @@
 function add(a, b) {
-  return a - b;
+  return a + b;
 }
";
    let outcome = apply_auto(content, edit, &ApplyOptions::default()).unwrap();
    assert_eq!(outcome.content, "\nfunction add(a, b) {\n  return a + b;\n}\n");
    assert_eq!(outcome.blocks_applied, 1);
    assert_eq!(outcome.blocks_failed, 0);
}

// =============================================================================
// Cross-cutting properties
// =============================================================================

#[test]
fn sequential_blocks_see_prior_replacements() {
    // Block 2's search text equals block 1's replacement text
    let content = "start\n";
    let edit = "\
<<<<<<< SEARCH
start
=======
middle
>>>>>>> REPLACE
<<<<<<< SEARCH
middle
=======
end
>>>>>>> REPLACE
";
    let outcome = apply_auto(content, edit, &ApplyOptions::default()).unwrap();
    assert_eq!(outcome.content, "end\n");
    assert_eq!(outcome.blocks_applied, 2);
    assert_eq!(outcome.blocks_failed, 0);
}

#[test]
fn format_routing_never_crosses_dialects() {
    let edit = "<<<<<<< SEARCH\nalpha\n=======\nbeta\n>>>>>>> REPLACE\n";
    // Routed as search/replace automatically
    let auto = apply_auto("alpha\n", edit, &ApplyOptions::default()).unwrap();
    assert_eq!(auto.content, "beta\n");

    // Forcing the unified applier on marker text is a parse error, not a
    // silent misapply
    let forced = apply_with_format("alpha\n", edit, EditFormat::Unified, &ApplyOptions::default());
    assert!(forced.is_err());

    let diff = "@@ -1,1 +1,1 @@\n-alpha\n+beta\n";
    let forced = apply_with_format(
        "alpha\n",
        diff,
        EditFormat::SearchReplace,
        &ApplyOptions::default(),
    );
    assert!(forced.is_err());
}

#[test]
fn strict_mode_is_all_or_nothing_across_facade() {
    let content = "alpha\nbeta\n";
    let edit = "\
<<<<<<< SEARCH
alpha
=======
ALPHA
>>>>>>> REPLACE
<<<<<<< SEARCH
does not exist
=======
whatever
>>>>>>> REPLACE
";
    let outcome = apply_auto(content, edit, &ApplyOptions::strict()).unwrap();
    assert_eq!(outcome.content, content);
    assert_eq!(outcome.blocks_applied, 0);
    assert_eq!(outcome.blocks_failed, 2);
    assert_eq!(outcome.failed_units.len(), 2);
}

#[test]
fn identical_calls_produce_identical_outcomes() {
    let content = "dup\nx\ndup\ny\ndup\n";
    let edit = "<<<<<<< SEARCH\ndup\n=======\nuniq\n>>>>>>> REPLACE\n";
    let opts = ApplyOptions {
        enable_telemetry: true,
        ..ApplyOptions::default()
    };
    let a = apply_auto(content, edit, &opts).unwrap();
    let b = apply_auto(content, edit, &opts).unwrap();
    assert_eq!(a, b);
    // The ambiguity tie-break is part of the deterministic contract
    assert!(a.warnings.iter().any(|w| w.contains("equally good")));
    assert_eq!(a.content, "uniq\nx\ndup\ny\ndup\n");
}

#[test]
fn unknown_format_is_raised_before_any_parser() {
    let err = apply_auto("content\n", "just prose, no edit dialect\n", &ApplyOptions::default());
    assert_eq!(err, Err(PatchError::UnknownFormat));
}

#[test]
fn parse_error_reports_block_index() {
    let edit = "\
<<<<<<< SEARCH
fine
=======
fine
>>>>>>> REPLACE
<<<<<<< SEARCH
broken, never terminated
";
    match apply_auto("content\n", edit, &ApplyOptions::default()) {
        Err(PatchError::Parse { block_index, .. }) => assert_eq!(block_index, 1),
        other => panic!("expected Parse error, got {:?}", other),
    }
}

#[test]
fn fuzzy_threshold_is_honored() {
    let content = "fn main() {\n    println!(\"Helo\");\n}\n";
    let edit = "\
<<<<<<< SEARCH
fn main() {
    println!(\"Hello\");
}
=======
fn main() {
    println!(\"Hello, world!\");
}
>>>>>>> REPLACE
";
    // Default threshold: the near-identical block matches fuzzily
    let outcome = apply_auto(content, edit, &ApplyOptions::default()).unwrap();
    assert!(outcome.content.contains("Hello, world!"));

    // An impossible threshold turns the same edit into a failure
    let opts = ApplyOptions {
        fuzzy_threshold: 0.999,
        ..ApplyOptions::default()
    };
    let outcome = apply_auto(content, edit, &opts).unwrap();
    assert_eq!(outcome.blocks_failed, 1);
    assert_eq!(outcome.content, content);
}
