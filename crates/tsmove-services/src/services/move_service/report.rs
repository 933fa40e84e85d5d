use indexmap::IndexSet;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A single file relocation performed by a move
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovedFile {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// A file whose specifiers could not be updated and needs a manual fix
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedRewrite {
    pub file: PathBuf,
    pub error: String,
}

/// Summary of one move request
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MoveReport {
    pub moved: Vec<MovedFile>,
    /// Files whose text changed, at their final location
    pub rewritten: IndexSet<PathBuf>,
    pub failed: Vec<FailedRewrite>,
}

impl MoveReport {
    pub(crate) fn record_rewrite(&mut self, file: PathBuf) {
        self.rewritten.insert(file);
    }

    pub(crate) fn record_failure(&mut self, file: PathBuf, error: impl Into<String>) {
        self.failed.push(FailedRewrite {
            file,
            error: error.into(),
        });
    }

    /// Record a relocation and follow it in files already reported.
    /// A second hop of the same file (through a temporary directory)
    /// extends the first entry.
    pub(crate) fn record_move(&mut self, from: &Path, to: &Path) {
        match self.moved.iter_mut().find(|m| m.to == from) {
            Some(earlier) => earlier.to = to.to_path_buf(),
            None => self.moved.push(MovedFile {
                from: from.to_path_buf(),
                to: to.to_path_buf(),
            }),
        }

        if self.rewritten.contains(from) {
            self.rewritten = self
                .rewritten
                .drain(..)
                .map(|file| if file == from { to.to_path_buf() } else { file })
                .collect();
        }
        for failure in &mut self.failed {
            if failure.file == from {
                failure.file = to.to_path_buf();
            }
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}
