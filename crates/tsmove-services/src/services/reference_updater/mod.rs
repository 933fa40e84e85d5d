//! Reference updater
//!
//! [`ReferenceIndexer`] is the session object of a move: it owns the reverse
//! reference index together with the resolution snapshot (alias tables and
//! package registry) it was built from. Every rewrite it performs re-indexes
//! the rewritten file before returning, so the index never lags behind the
//! disk for files written through it.

pub mod edit_engine;
mod index;

pub use index::{IndexedReference, ReferenceIndex};

use crate::services::discovery::discover;
use crate::services::filesystem::{FileSystem, LocalFileSystem};
use crate::services::resolution::{PackageRegistry, SourceExtensions, SpecifierResolver};
use indexmap::IndexSet;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use tsmove_config::ScanConfig;
use tsmove_foundation::paths::absolutize;
use tsmove_foundation::{ImportParser, MoveError, MoveResult, Replacement};
use tsmove_lang_typescript::TypeScriptImportParser;

/// Result of rewriting every referrer of one file
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RewriteOutcome {
    /// Referrers whose text changed
    pub rewritten: Vec<PathBuf>,
    /// Referrers that could not be rewritten, with the reason
    pub failed: Vec<(PathBuf, String)>,
}

pub struct ReferenceIndexer {
    root: PathBuf,
    scan: ScanConfig,
    parser: Arc<dyn ImportParser>,
    fs: Arc<dyn FileSystem>,
    resolver: SpecifierResolver,
    index: ReferenceIndex,
    initialized: bool,
}

impl ReferenceIndexer {
    /// Create an empty session for the project at `root`
    pub fn new(
        root: &Path,
        scan: ScanConfig,
        parser: Arc<dyn ImportParser>,
        fs: Arc<dyn FileSystem>,
    ) -> MoveResult<Self> {
        let cwd = std::env::current_dir().map_err(|e| MoveError::io(".", e))?;
        let extensions = SourceExtensions::new(scan.extensions.iter().cloned());
        Ok(Self {
            root: absolutize(&cwd, root),
            scan,
            parser,
            fs,
            resolver: SpecifierResolver::new(extensions),
            index: ReferenceIndex::new(),
            initialized: false,
        })
    }

    /// Session using the swc parser and the local filesystem
    pub fn with_defaults(root: &Path, scan: ScanConfig) -> MoveResult<Self> {
        Self::new(
            root,
            scan,
            Arc::new(TypeScriptImportParser::new()),
            Arc::new(LocalFileSystem),
        )
    }

    /// Load package names and alias tables, then index every source file.
    /// Later calls are no-ops.
    pub async fn initialize(&mut self) -> MoveResult<()> {
        if self.initialized {
            return Ok(());
        }

        let files = discover(&self.root, &self.scan).await?;

        let mut resolver = SpecifierResolver::new(self.resolver.extensions().clone())
            .with_packages(PackageRegistry::load(&files.manifests));
        resolver.load_alias_configs(&files.tsconfigs);
        self.resolver = resolver;

        self.index_files(&files.sources).await;
        self.initialized = true;

        info!(
            root = %self.root.display(),
            files = files.sources.len(),
            targets = self.index.len(),
            packages = self.resolver.packages().len(),
            "Reference index ready"
        );
        Ok(())
    }

    /// Rebuild the index from a fresh walk, keeping the resolution snapshot
    pub async fn scan_all(&mut self) -> MoveResult<()> {
        let files = discover(&self.root, &self.scan).await?;
        self.index = ReferenceIndex::new();
        self.index_files(&files.sources).await;
        Ok(())
    }

    /// Index files in batches, yielding to the runtime between batches.
    /// Unreadable or unparsable files are logged and skipped.
    async fn index_files(&mut self, files: &[PathBuf]) {
        let batch_size = self.scan.batch_size.max(1);
        for (batch_number, batch) in files.chunks(batch_size).enumerate() {
            for file in batch {
                let text = match self.fs.read_text(file).await {
                    Ok(text) => text,
                    Err(e) => {
                        warn!(file = %file.display(), error = %e, "Failed to read file, skipping");
                        continue;
                    }
                };
                if let Err(e) = self.process_file(&text, file, false) {
                    warn!(file = %file.display(), error = %e, "Failed to index file, skipping");
                }
            }
            debug!(batch = batch_number, files = batch.len(), "Indexed batch");
            tokio::task::yield_now().await;
        }
    }

    /// Index the imports of `text` as the content of `path`.
    ///
    /// With `delete_existing` the entries previously contributed by `path`
    /// are dropped first. Returns the number of indexed references.
    pub fn process_file(&mut self, text: &str, path: &Path, delete_existing: bool) -> MoveResult<usize> {
        if delete_existing {
            self.index.delete_outgoing(path);
        }

        let references = self.parser.extract_imports(path, text)?;
        let mut count = 0;
        for reference in references {
            if let Some(target) = self.resolver.resolve(path, &reference.specifier) {
                self.index.add_reference(target, path, reference.span);
                count += 1;
            }
        }
        debug!(file = %path.display(), references = count, "Indexed file");
        Ok(count)
    }

    /// Re-read `file` from disk and replace its outgoing index entries
    pub async fn refresh_file(&mut self, file: &Path) -> MoveResult<usize> {
        let text = self.fs.read_text(file).await?;
        self.process_file(&text, file, true)
    }

    /// Rewrite every referrer of `from` so it points at `to`.
    ///
    /// `to` need not exist yet. Failures are isolated per referrer.
    pub async fn update_imports(&mut self, from: &Path, to: &Path) -> RewriteOutcome {
        let source = self.resolver.identity_of(from);
        let referrers = self.index.referencing_files(&source);
        let mut outcome = RewriteOutcome::default();

        for referrer in referrers {
            let old = self
                .resolver
                .remove_extension(&self.resolver.to_specifier(&referrer, from));
            let new = SpecifierResolver::remove_index_suffix(
                &self
                    .resolver
                    .remove_extension(&self.resolver.to_specifier(&referrer, to)),
            );

            match self
                .replace_references(&referrer, &[Replacement::new(old, new)], &referrer)
                .await
            {
                Ok(true) => outcome.rewritten.push(referrer),
                Ok(false) => {}
                Err(e) => {
                    warn!(file = %referrer.display(), error = %e, "Failed to update imports, fix manually");
                    outcome.failed.push((referrer, e.to_string()));
                }
            }
        }

        outcome
    }

    /// Re-express the imports of a file just moved from `from` to `to`
    /// relative to its new location, then forget `from`.
    ///
    /// Returns whether the moved file's text changed.
    pub async fn update_moved_file(&mut self, from: &Path, to: &Path) -> MoveResult<bool> {
        let result = if self.resolver.extensions().is_source(to) {
            self.rewrite_moved_file(from, to).await
        } else {
            Ok(false)
        };

        let identity = self.resolver.identity_of(from);
        if identity == self.resolver.identity_of(to) {
            // `util.ts` -> `util/index.ts`: importers still point at it
            self.index.delete_outgoing(from);
        } else {
            self.index.delete_by_path(from, &identity);
        }
        result
    }

    async fn rewrite_moved_file(&mut self, from: &Path, to: &Path) -> MoveResult<bool> {
        let text = self.fs.read_text(to).await?;
        let references = self.parser.extract_imports(to, &text)?;

        let mut seen = IndexSet::new();
        let replacements: Vec<Replacement> = references
            .iter()
            .filter(|r| seen.insert(r.specifier.as_str()))
            .filter_map(|r| {
                let target = self.resolver.resolve_path(from, &r.specifier)?;
                Some(Replacement::new(
                    r.specifier.clone(),
                    self.resolver.to_specifier(to, &target),
                ))
            })
            .collect();

        let rewritten = self.replace_references(to, &replacements, from).await?;
        if !rewritten {
            // index under the new path even when no specifier changed
            self.process_file(&text, to, true)?;
        }
        Ok(rewritten)
    }

    /// Apply `replacements` to `file`, resolving specifiers against
    /// `resolve_from`. Writes and re-indexes only when an edit results.
    pub async fn replace_references(
        &mut self,
        file: &Path,
        replacements: &[Replacement],
        resolve_from: &Path,
    ) -> MoveResult<bool> {
        let text = self.fs.read_text(file).await?;
        let references = self.parser.extract_imports(file, &text)?;
        let edits =
            edit_engine::compute_edits(&self.resolver, resolve_from, &references, replacements);
        if edits.is_empty() {
            return Ok(false);
        }

        let edit_count = edits.len();
        let new_text = edit_engine::apply_edits(&text, edits)?;
        self.fs.write_text(file, &new_text).await?;
        debug!(file = %file.display(), edits = edit_count, "Rewrote import specifiers");

        self.process_file(&new_text, file, true)?;
        Ok(true)
    }

    /// Every indexed import site of `file`
    pub fn references_to(&self, file: &Path) -> Vec<IndexedReference> {
        let file = absolutize(&self.root, file);
        self.index.references(&self.resolver.identity_of(&file))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolver(&self) -> &SpecifierResolver {
        &self.resolver
    }

    pub fn index(&self) -> &ReferenceIndex {
        &self.index
    }

    pub fn file_system(&self) -> Arc<dyn FileSystem> {
        Arc::clone(&self.fs)
    }
}
