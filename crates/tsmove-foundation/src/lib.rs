//! Foundation Layer - error taxonomy, protocol types and collaborator traits
//!
//! This crate provides the building blocks shared by every other tsmove crate:
//! - `errors`: the `MoveError` taxonomy and `MoveResult` alias
//! - `protocol`: spans, import references, text edits and replacement pairs
//! - `parser`: the `ImportParser` seam implemented by language crates
//! - `paths`: lexical path normalization shared by resolver and config loader

pub mod errors;
pub mod parser;
pub mod paths;
pub mod protocol;

// Re-export commonly used types for convenience
pub use errors::{MoveError, MoveResult};
pub use parser::ImportParser;
pub use protocol::{ImportReference, Replacement, Span, TextEdit};
