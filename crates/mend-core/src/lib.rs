//! Core types for the mend edit application engine.
//!
//! This crate provides the shared types used across the mend crates.
//! It has ZERO internal crate dependencies and only depends on external
//! libraries.
//!
//! ## Architecture Principle
//!
//! mend-core sits at the bottom of the dependency hierarchy:
//! - Layer 1 (Foundation): mend-core ← YOU ARE HERE
//! - Layer 2 (Engine): mend-patch

pub mod error;
pub mod options;
pub mod outcome;

pub use error::{PatchError, Result};
pub use options::{
    ApplyOptions, EditFormat, MatchStrategy, DEFAULT_FUZZY_THRESHOLD, DEFAULT_HUNK_FUZZ,
};
pub use outcome::{ApplyOutcome, FailedUnit, SNIPPET_MAX_LEN};
