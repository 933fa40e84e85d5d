//! Move Service - relocates files and directories and keeps imports valid
//!
//! A file move runs four steps:
//! 1. Validate: identical paths are a no-op, an existing target aborts
//! 2. Rewrite referrers: every file importing the source now imports the target
//! 3. Relocate: create parent directories, rename
//! 4. Rewrite self: the moved file's own imports are re-expressed from its new location
//!
//! Directory moves are expanded into file moves on an explicit task stack.
//! A directory moved into its own subtree first goes to a temporary sibling.

mod planner;
mod report;

pub use report::{FailedRewrite, MoveReport, MovedFile};

use crate::services::filesystem::FileSystem;
use crate::services::reference_updater::ReferenceIndexer;
use planner::{expand_directory, through_temp, MoveTask, TempNames};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn, Instrument};
use tsmove_config::{logging::move_span, AppConfig};
use tsmove_foundation::paths::{absolutize, is_in_dir};
use tsmove_foundation::{MoveError, MoveResult};

/// Move orchestration over one indexing session
pub struct MoveService<'a> {
    /// Session holding the reference index
    indexer: &'a mut ReferenceIndexer,
    fs: Arc<dyn FileSystem>,
}

impl<'a> MoveService<'a> {
    pub fn new(indexer: &'a mut ReferenceIndexer) -> Self {
        let fs = indexer.file_system();
        Self { indexer, fs }
    }

    /// Move `source` to `target`, both relative to the project root
    /// (absolute paths are taken as is).
    ///
    /// Fails with [`MoveError::TargetExists`] before touching anything when
    /// the target is already present.
    pub async fn move_or_die(&mut self, source: &Path, target: &Path) -> MoveResult<MoveReport> {
        let source = absolutize(self.indexer.root(), source);
        let target = absolutize(self.indexer.root(), target);

        let span = move_span(&source, &target);
        self.move_path(source, target).instrument(span).await
    }

    async fn move_path(&mut self, source: PathBuf, target: PathBuf) -> MoveResult<MoveReport> {
        info!("Starting move");

        let mut report = MoveReport::default();
        let mut temp_names = TempNames::default();
        let mut stack = vec![MoveTask::relocate(source, target)];

        while let Some(task) = stack.pop() {
            match task {
                MoveTask::RemoveDir(dir) => {
                    debug!(dir = %dir.display(), "Removing emptied directory");
                    self.fs.remove_dir_all(&dir).await?;
                }
                MoveTask::Move { source, target } => {
                    if source == target {
                        debug!(path = %source.display(), "Source equals target, nothing to do");
                        continue;
                    }
                    if self.fs.exists(&target).await {
                        return Err(MoveError::target_exists(target));
                    }
                    if !self.fs.exists(&source).await {
                        return Err(MoveError::source_not_found(source));
                    }

                    if !self.fs.is_dir(&source).await {
                        self.move_file(&source, &target, &mut report).await?;
                    } else if is_in_dir(&source, &target) {
                        let parent = source.parent().unwrap_or_else(|| Path::new("/"));
                        let temp = temp_names.allocate(parent, self.fs.as_ref()).await?;
                        debug!(temp = %temp.display(), "Moving directory into its own subtree via temporary sibling");
                        stack.extend(through_temp(&source, &target, &temp));
                    } else {
                        self.fs.ensure_dir(&target).await?;
                        let children = self.fs.read_dir(&source).await?;
                        stack.extend(expand_directory(&source, &target, &children));
                    }
                }
            }
        }

        info!(
            moved = report.moved.len(),
            rewritten = report.rewritten.len(),
            failed = report.failed.len(),
            "Move complete"
        );
        Ok(report)
    }

    async fn move_file(&mut self, source: &Path, target: &Path, report: &mut MoveReport) -> MoveResult<()> {
        info!(source = %source.display(), target = %target.display(), "Moving file");

        let outcome = self.indexer.update_imports(source, target).await;
        for (file, error) in outcome.failed {
            report.record_failure(file, error);
        }

        if let Some(parent) = target.parent() {
            self.fs.ensure_dir(parent).await?;
        }
        self.fs.rename(source, target).await?;

        // alias specifiers with several mappings only resolve once the target exists
        for file in outcome.rewritten {
            if file != source {
                if let Err(e) = self.indexer.refresh_file(&file).await {
                    warn!(file = %file.display(), error = %e, "Failed to re-index rewritten file");
                }
            }
            report.record_rewrite(file);
        }
        report.record_move(source, target);

        match self.indexer.update_moved_file(source, target).await {
            Ok(true) => report.record_rewrite(target.to_path_buf()),
            Ok(false) => {}
            Err(e) => {
                warn!(file = %target.display(), error = %e, "Failed to update imports of moved file, fix manually");
                report.record_failure(target.to_path_buf(), e.to_string());
            }
        }

        Ok(())
    }
}

/// Index the project at `root` and perform one root-relative move
pub async fn move_in_project(
    root: &Path,
    source: &Path,
    target: &Path,
    config: &AppConfig,
) -> MoveResult<MoveReport> {
    let mut indexer = ReferenceIndexer::with_defaults(root, config.scan.clone())?;
    indexer.initialize().await?;
    MoveService::new(&mut indexer).move_or_die(source, target).await
}
