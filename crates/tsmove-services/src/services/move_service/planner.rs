//! Work items of a move and temporary sibling names

use crate::services::filesystem::FileSystem;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tsmove_foundation::{MoveError, MoveResult};

const TEMP_PREFIX: &str = ".tsmove-";
const MAX_TEMP_ATTEMPTS: usize = 16;

/// One step of a (possibly recursive) move, executed from a LIFO stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MoveTask {
    Move { source: PathBuf, target: PathBuf },
    RemoveDir(PathBuf),
}

impl MoveTask {
    pub(crate) fn relocate(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self::Move {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Tasks moving each child of `source` under `target`, then removing `source`.
/// Pushed in reverse so children run in name order.
pub(crate) fn expand_directory(source: &Path, target: &Path, children: &[PathBuf]) -> Vec<MoveTask> {
    let mut tasks = vec![MoveTask::RemoveDir(source.to_path_buf())];
    for child in children.iter().rev() {
        if let Some(name) = child.file_name() {
            tasks.push(MoveTask::relocate(child.clone(), target.join(name)));
        }
    }
    tasks
}

/// Tasks moving `source` into its own subtree via a temporary sibling.
/// Pushed so that `source → temp` runs before `temp → target`.
pub(crate) fn through_temp(source: &Path, target: &Path, temp: &Path) -> Vec<MoveTask> {
    vec![
        MoveTask::relocate(temp, target),
        MoveTask::relocate(source, temp),
    ]
}

/// Temporary names issued during one move, checked alongside the disk
#[derive(Debug, Default)]
pub(crate) struct TempNames {
    issued: HashSet<PathBuf>,
}

impl TempNames {
    pub(crate) async fn allocate(&mut self, parent: &Path, fs: &dyn FileSystem) -> MoveResult<PathBuf> {
        for _ in 0..MAX_TEMP_ATTEMPTS {
            let candidate = parent.join(format!("{}{}", TEMP_PREFIX, uuid::Uuid::new_v4().simple()));
            if self.issued.contains(&candidate) || fs.exists(&candidate).await {
                continue;
            }
            self.issued.insert(candidate.clone());
            return Ok(candidate);
        }
        Err(MoveError::internal(format!(
            "Could not find a free temporary name in {}",
            parent.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::filesystem::LocalFileSystem;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_expand_directory_runs_children_in_order() {
        let children = vec![PathBuf::from("/a/b/x.ts"), PathBuf::from("/a/b/y.ts")];
        let mut stack = expand_directory(Path::new("/a/b"), Path::new("/c"), &children);

        assert_eq!(stack.pop(), Some(MoveTask::relocate("/a/b/x.ts", "/c/x.ts")));
        assert_eq!(stack.pop(), Some(MoveTask::relocate("/a/b/y.ts", "/c/y.ts")));
        assert_eq!(stack.pop(), Some(MoveTask::RemoveDir(PathBuf::from("/a/b"))));
        assert_eq!(stack.pop(), None);
    }

    #[test]
    fn test_through_temp_order() {
        let mut stack = through_temp(Path::new("/a/b"), Path::new("/a/b/c"), Path::new("/a/t"));
        assert_eq!(stack.pop(), Some(MoveTask::relocate("/a/b", "/a/t")));
        assert_eq!(stack.pop(), Some(MoveTask::relocate("/a/t", "/a/b/c")));
    }

    #[tokio::test]
    async fn test_temp_names_are_unique() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut names = TempNames::default();

        let first = names.allocate(dir.path(), &LocalFileSystem).await.unwrap();
        let second = names.allocate(dir.path(), &LocalFileSystem).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(first.parent(), Some(dir.path()));
        assert!(first.file_name().unwrap().to_string_lossy().starts_with(TEMP_PREFIX));
    }
}
