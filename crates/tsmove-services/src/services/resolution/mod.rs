//! Specifier resolution
//!
//! Emulates the compiler's module lookup from configuration data alone:
//! relative specifiers, `compilerOptions.paths` wildcard aliases and
//! workspace package names. Anything else is an external import and is
//! never indexed or rewritten.

mod identity;
mod package_registry;

pub use identity::{locate_module, FileIdentity, SourceExtensions};
pub use package_registry::PackageRegistry;

use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};
use tsmove_foundation::paths::{is_in_dir, normalize_path, relative_path, to_unix};
use tsmove_lang_typescript::{load_alias_config, AliasConfig, TSCONFIG_FILE_NAMES};

/// Resolution state of one project: extensions, alias tables and packages
#[derive(Debug, Clone, Default)]
pub struct SpecifierResolver {
    extensions: SourceExtensions,
    /// Alias configuration per directory holding a tsconfig
    aliases: IndexMap<PathBuf, AliasConfig>,
    packages: PackageRegistry,
}

impl SpecifierResolver {
    pub fn new(extensions: SourceExtensions) -> Self {
        Self {
            extensions,
            ..Default::default()
        }
    }

    pub fn with_packages(mut self, packages: PackageRegistry) -> Self {
        self.packages = packages;
        self
    }

    /// Register an alias table. Within one directory `tsconfig.json` beats
    /// `tsconfig.build.json` regardless of registration order.
    pub fn add_alias_config(&mut self, config: AliasConfig) {
        let dir = config.config_dir().to_path_buf();
        let rank = |c: &AliasConfig| {
            c.config_path
                .file_name()
                .and_then(|name| TSCONFIG_FILE_NAMES.iter().position(|n| name == *n))
                .unwrap_or(usize::MAX)
        };
        match self.aliases.get(&dir) {
            Some(existing) if rank(existing) <= rank(&config) => {}
            _ => {
                self.aliases.insert(dir, config);
            }
        }
    }

    /// Load every tsconfig found by traversal; broken files are logged and skipped.
    pub fn load_alias_configs(&mut self, tsconfigs: &[PathBuf]) {
        for path in tsconfigs {
            match load_alias_config(path) {
                Ok(Some(config)) => {
                    debug!(config = %path.display(), patterns = config.patterns.len(), "Loaded path aliases");
                    self.add_alias_config(config);
                }
                Ok(None) => {}
                Err(e) => warn!(config = %path.display(), error = %e, "Skipping unreadable tsconfig"),
            }
        }
    }

    pub fn extensions(&self) -> &SourceExtensions {
        &self.extensions
    }

    pub fn packages(&self) -> &PackageRegistry {
        &self.packages
    }

    /// Nearest alias configuration of a file, walking parent directories
    pub fn nearest_alias_config(&self, from_file: &Path) -> Option<&AliasConfig> {
        from_file
            .ancestors()
            .skip(1)
            .find_map(|dir| self.aliases.get(dir))
    }

    /// The absolute path `specifier` denotes when written in `from_file`,
    /// or `None` for an external import.
    pub fn resolve_path(&self, from_file: &Path, specifier: &str) -> Option<PathBuf> {
        if specifier.starts_with('.') {
            let dir = from_file.parent().unwrap_or_else(|| Path::new("/"));
            return Some(normalize_path(&dir.join(specifier)));
        }

        if let Some(path) = self.resolve_alias(from_file, specifier) {
            return Some(path);
        }

        let resolved = self.packages.resolve(specifier);
        if resolved.is_none() {
            trace!(file = %from_file.display(), specifier, "Leaving external import unresolved");
        }
        resolved
    }

    fn resolve_alias(&self, from_file: &Path, specifier: &str) -> Option<PathBuf> {
        let config = self.nearest_alias_config(from_file)?;

        for pattern in &config.patterns {
            let Some(tail) = pattern.match_tail(specifier) else {
                continue;
            };

            let candidates = pattern
                .mapped_dirs
                .iter()
                .map(|dir| normalize_path(&dir.join(tail)));
            for candidate in candidates {
                if locate_module(&candidate, &self.extensions).is_some() {
                    return Some(candidate);
                }
            }

            // a single mapping is trusted even when nothing exists there yet
            if let [only] = pattern.mapped_dirs.as_slice() {
                return Some(normalize_path(&only.join(tail)));
            }
        }

        None
    }

    /// Identity of the file `specifier` points at, `None` for external imports
    pub fn resolve(&self, from_file: &Path, specifier: &str) -> Option<FileIdentity> {
        self.resolve_path(from_file, specifier)
            .map(|path| FileIdentity::from_target(&path, &self.extensions))
    }

    /// Identity of a concrete file on disk (or about to be)
    pub fn identity_of(&self, file: &Path) -> FileIdentity {
        FileIdentity::from_path(file, &self.extensions)
    }

    /// Best specifier for importing `target` from `from_file`: alias first,
    /// then workspace package, then a `./`-prefixed relative path.
    pub fn to_specifier(&self, from_file: &Path, target: &Path) -> String {
        let target = normalize_path(target);

        if let Some(config) = self.nearest_alias_config(from_file) {
            for pattern in &config.patterns {
                for dir in &pattern.mapped_dirs {
                    if !is_in_dir(dir, &target) {
                        continue;
                    }
                    let tail = to_unix(&relative_path(dir, &target));
                    if !tail.is_empty() {
                        return format!("{}{}", pattern.prefix, tail);
                    }
                }
            }
        }

        if let Some(specifier) = self.packages.specifier_for(from_file, &target) {
            return specifier;
        }

        let dir = from_file.parent().unwrap_or_else(|| Path::new("/"));
        let relative = to_unix(&relative_path(dir, &target));
        // `.cache/x` is a bare specifier to the compiler; only `./` and `../` are relative
        if relative.is_empty() {
            ".".to_string()
        } else if relative == ".." || relative.starts_with("./") || relative.starts_with("../") {
            relative
        } else {
            format!("./{}", relative)
        }
    }

    pub fn remove_extension(&self, specifier: &str) -> String {
        self.extensions.remove_extension(specifier)
    }

    pub fn remove_index_suffix(specifier: &str) -> String {
        specifier
            .strip_suffix("/index")
            .unwrap_or(specifier)
            .to_string()
    }
}
