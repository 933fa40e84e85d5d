//! Parser seam
//!
//! The reference index never parses source itself. Language crates implement
//! [`ImportParser`] and hand back the literal specifiers with their spans.

use crate::errors::MoveResult;
use crate::protocol::ImportReference;
use std::path::Path;

/// Extracts literal-string module specifiers from source text.
pub trait ImportParser: Send + Sync {
    /// Returns every literal import specifier of `text`, in source order.
    ///
    /// `path` selects the dialect (e.g. TSX) and is used in error messages;
    /// it is never read from disk.
    fn extract_imports(&self, path: &Path, text: &str) -> MoveResult<Vec<ImportReference>>;
}
