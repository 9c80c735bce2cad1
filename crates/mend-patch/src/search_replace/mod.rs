//! The SEARCH/REPLACE block dialect: parsing and application.

mod applier;
mod parser;

pub use applier::apply_blocks;
pub use parser::{parse_blocks, EditBlock};

pub(crate) use parser::{REPLACE_MARKER, SEARCH_MARKER};
