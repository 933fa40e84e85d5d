//! Project file discovery

use crate::services::resolution::SourceExtensions;
use std::path::{Path, PathBuf};
use tracing::debug;
use tsmove_config::ScanConfig;
use tsmove_foundation::{MoveError, MoveResult};
use tsmove_lang_typescript::{MANIFEST_FILE_NAME, TSCONFIG_FILE_NAMES};
use walkdir::WalkDir;

/// Files relevant to indexing, in walk order (names sorted per directory)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFiles {
    pub sources: Vec<PathBuf>,
    pub tsconfigs: Vec<PathBuf>,
    pub manifests: Vec<PathBuf>,
}

/// Walk `root`, skipping excluded directory names at any depth.
///
/// The walk is blocking and runs on tokio's blocking pool.
pub async fn discover(root: &Path, scan: &ScanConfig) -> MoveResult<ProjectFiles> {
    let root = root.to_path_buf();
    let excluded = scan.excluded_dirs.clone();
    let extensions = SourceExtensions::new(scan.extensions.iter().cloned());

    let files = tokio::task::spawn_blocking(move || walk(&root, &excluded, &extensions))
        .await
        .map_err(|e| MoveError::internal(format!("Project walk panicked: {}", e)))??;

    debug!(
        sources = files.sources.len(),
        tsconfigs = files.tsconfigs.len(),
        manifests = files.manifests.len(),
        "Discovered project files"
    );
    Ok(files)
}

fn walk(root: &Path, excluded: &[String], extensions: &SourceExtensions) -> MoveResult<ProjectFiles> {
    if !root.is_dir() {
        return Err(MoveError::source_not_found(root));
    }

    let mut files = ProjectFiles::default();
    let entries = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !excluded.iter().any(|name| entry.file_name() == name.as_str())
        })
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file());

    for entry in entries {
        let path = entry.into_path();
        let name = path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();

        if TSCONFIG_FILE_NAMES.contains(&name.as_str()) {
            files.tsconfigs.push(path);
        } else if name == MANIFEST_FILE_NAME {
            files.manifests.push(path);
        } else if extensions.is_source(&path) {
            files.sources.push(path);
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "").unwrap();
    }

    #[tokio::test]
    async fn test_discover_classifies_and_excludes() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        for file in [
            "tsconfig.json",
            "package.json",
            "src/a.ts",
            "src/b.tsx",
            "src/types.d.ts",
            "src/readme.md",
            "src/node_modules_docs/c.ts",
            "node_modules/dep/index.ts",
            "node_modules/dep/package.json",
            "pkg/core/package.json",
            "pkg/core/tsconfig.build.json",
            "typings/globals.d.ts",
            ".git/hooks/x.ts",
        ] {
            touch(&root.join(file));
        }

        let files = discover(root, &ScanConfig::default()).await.unwrap();

        assert_eq!(
            files.sources,
            vec![
                root.join("src/a.ts"),
                root.join("src/b.tsx"),
                root.join("src/node_modules_docs/c.ts"),
                root.join("src/types.d.ts"),
            ]
        );
        assert_eq!(
            files.tsconfigs,
            vec![root.join("pkg/core/tsconfig.build.json"), root.join("tsconfig.json")]
        );
        assert_eq!(
            files.manifests,
            vec![root.join("package.json"), root.join("pkg/core/package.json")]
        );
    }

    #[tokio::test]
    async fn test_missing_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(discover(&dir.path().join("nope"), &ScanConfig::default()).await.is_err());
    }
}
