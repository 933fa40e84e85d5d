//! Filesystem primitives used by the move orchestrator
//!
//! Everything that mutates the tree goes through [`FileSystem`], so tests can
//! wrap [`LocalFileSystem`] and inject failures for single files.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;
use tsmove_foundation::{MoveError, MoveResult};

#[async_trait]
pub trait FileSystem: Send + Sync {
    async fn exists(&self, path: &Path) -> bool;

    async fn is_dir(&self, path: &Path) -> bool;

    async fn read_text(&self, path: &Path) -> MoveResult<String>;

    async fn write_text(&self, path: &Path, text: &str) -> MoveResult<()>;

    /// Move a file or directory; the parent of `to` must exist.
    async fn rename(&self, from: &Path, to: &Path) -> MoveResult<()>;

    /// Direct children of a directory, sorted by name
    async fn read_dir(&self, path: &Path) -> MoveResult<Vec<PathBuf>>;

    async fn remove_dir_all(&self, path: &Path) -> MoveResult<()>;

    /// Create a directory and all missing parents
    async fn ensure_dir(&self, path: &Path) -> MoveResult<()>;
}

/// [`FileSystem`] backed by `tokio::fs`
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileSystem;

#[async_trait]
impl FileSystem for LocalFileSystem {
    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn is_dir(&self, path: &Path) -> bool {
        tokio::fs::metadata(path)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }

    async fn read_text(&self, path: &Path) -> MoveResult<String> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| MoveError::io(path, e))
    }

    async fn write_text(&self, path: &Path, text: &str) -> MoveResult<()> {
        tokio::fs::write(path, text)
            .await
            .map_err(|e| MoveError::io(path, e))
    }

    async fn rename(&self, from: &Path, to: &Path) -> MoveResult<()> {
        debug!(from = %from.display(), to = %to.display(), "Renaming");
        tokio::fs::rename(from, to)
            .await
            .map_err(|e| MoveError::io(from, e))
    }

    async fn read_dir(&self, path: &Path) -> MoveResult<Vec<PathBuf>> {
        let mut entries = tokio::fs::read_dir(path)
            .await
            .map_err(|e| MoveError::io(path, e))?;
        let mut children = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| MoveError::io(path, e))?
        {
            children.push(entry.path());
        }
        children.sort();
        Ok(children)
    }

    async fn remove_dir_all(&self, path: &Path) -> MoveResult<()> {
        tokio::fs::remove_dir_all(path)
            .await
            .map_err(|e| MoveError::io(path, e))
    }

    async fn ensure_dir(&self, path: &Path) -> MoveResult<()> {
        tokio::fs::create_dir_all(path)
            .await
            .map_err(|e| MoveError::io(path, e))
    }
}
