//! Reverse reference index
//!
//! Keeps both directions so that re-indexing one file never scans the
//! whole graph:
//! - by target: identity -> every (referencing file, span) importing it
//! - by file: referencing file -> identities it imports

use crate::services::resolution::FileIdentity;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tsmove_foundation::Span;

/// One import site: the file holding it and the specifier's byte span
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct IndexedReference {
    pub file: PathBuf,
    pub span: Span,
}

#[derive(Debug, Default)]
pub struct ReferenceIndex {
    by_target: IndexMap<FileIdentity, IndexSet<IndexedReference>>,
    by_file: IndexMap<PathBuf, IndexSet<FileIdentity>>,
}

impl ReferenceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_reference(&mut self, target: FileIdentity, file: &Path, span: Span) {
        self.by_file
            .entry(file.to_path_buf())
            .or_default()
            .insert(target.clone());
        self.by_target
            .entry(target)
            .or_default()
            .insert(IndexedReference {
                file: file.to_path_buf(),
                span,
            });
    }

    /// Every import site of `target`, in insertion order
    pub fn references(&self, target: &FileIdentity) -> Vec<IndexedReference> {
        self.by_target
            .get(target)
            .map(|refs| refs.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Distinct files importing `target`, first-seen order
    pub fn referencing_files(&self, target: &FileIdentity) -> Vec<PathBuf> {
        let mut files: IndexSet<PathBuf> = IndexSet::new();
        if let Some(refs) = self.by_target.get(target) {
            files.extend(refs.iter().map(|r| r.file.clone()));
        }
        files.into_iter().collect()
    }

    /// Drop every entry contributed by `file`. Imports pointing at `file`
    /// are untouched.
    pub fn delete_outgoing(&mut self, file: &Path) {
        let Some(targets) = self.by_file.shift_remove(file) else {
            return;
        };
        for target in targets {
            if let Some(refs) = self.by_target.get_mut(&target) {
                refs.retain(|r| r.file != file);
                if refs.is_empty() {
                    self.by_target.shift_remove(&target);
                }
            }
        }
    }

    /// Forget a file that no longer exists at `file`: its outgoing entries
    /// and its identity as a key.
    pub fn delete_by_path(&mut self, file: &Path, identity: &FileIdentity) {
        self.delete_outgoing(file);
        if let Some(refs) = self.by_target.shift_remove(identity) {
            for reference in refs {
                if let Some(targets) = self.by_file.get_mut(&reference.file) {
                    targets.shift_remove(identity);
                }
            }
        }
    }

    /// Number of indexed targets
    pub fn len(&self) -> usize {
        self.by_target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_target.is_empty()
    }

    /// Number of files contributing references
    pub fn file_count(&self) -> usize {
        self.by_file.len()
    }
}
