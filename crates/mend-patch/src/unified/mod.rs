//! The unified diff dialect: parsing and application.

mod applier;
mod parser;

pub use applier::apply_hunks;
pub use parser::{parse_hunks, Hunk, HunkLine, LineKind};

pub(crate) use parser::{looks_like_file_header, HUNK_HEADER};
