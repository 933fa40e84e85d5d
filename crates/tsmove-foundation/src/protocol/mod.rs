//! Protocol types shared between the parser, the reference index and the
//! edit engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Half-open byte range `[start, end)` within a file's raw source.
///
/// For import references the span covers the specifier text only, never the
/// surrounding quote characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start {start} is past its end {end}");
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True when the two ranges share at least one byte.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// A literal module specifier found in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImportReference {
    /// Text between the quotes, e.g. `./util/x`
    pub specifier: String,
    /// Location of that text in the raw source
    pub span: Span,
}

impl ImportReference {
    pub fn new(specifier: impl Into<String>, span: Span) -> Self {
        Self {
            specifier: specifier.into(),
            span,
        }
    }
}

/// A single substitution of `span` in the original text by `new_text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEdit {
    pub span: Span,
    pub new_text: String,
}

impl TextEdit {
    pub fn new(span: Span, new_text: impl Into<String>) -> Self {
        Self {
            span,
            new_text: new_text.into(),
        }
    }

    /// Net change in text length once this edit is applied.
    pub fn length_delta(&self) -> isize {
        self.new_text.len() as isize - self.span.len() as isize
    }
}

/// An `(old specifier, new specifier)` pair requested for one file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Replacement {
    pub old: String,
    pub new: String,
}

impl Replacement {
    pub fn new(old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            old: old.into(),
            new: new.into(),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.old == self.new
    }
}
