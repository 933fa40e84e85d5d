//! Workspace package registry
//!
//! Maps `package.json` names to their root directories so that
//! `@app/core/x` resolves into `/pkg/core/x` and back.

use indexmap::IndexMap;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tsmove_foundation::paths::{is_in_dir, normalize_path, relative_path, to_unix};
use tsmove_lang_typescript::load_package_name;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageRegistry {
    packages: IndexMap<String, PathBuf>,
}

impl PackageRegistry {
    /// Build from `(name, root)` pairs. A name claimed by two roots is
    /// ambiguous and dropped entirely.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, PathBuf)>,
    {
        let mut packages: IndexMap<String, PathBuf> = IndexMap::new();
        let mut ambiguous: HashSet<String> = HashSet::new();

        for (name, root) in entries {
            if ambiguous.contains(&name) {
                continue;
            }
            let root = normalize_path(&root);
            match packages.get(&name) {
                Some(existing) if existing == &root => {}
                Some(existing) => {
                    debug!(package = %name, first = %existing.display(), second = %root.display(), "Dropping ambiguous package name");
                    packages.shift_remove(&name);
                    ambiguous.insert(name);
                }
                None => {
                    packages.insert(name, root);
                }
            }
        }

        Self { packages }
    }

    /// Load every manifest; unreadable or nameless manifests are skipped.
    pub fn load(manifests: &[PathBuf]) -> Self {
        let entries = manifests.iter().filter_map(|manifest| {
            let root = manifest.parent()?.to_path_buf();
            match load_package_name(manifest) {
                Ok(Some(name)) => Some((name, root)),
                Ok(None) => None,
                Err(e) => {
                    warn!(manifest = %manifest.display(), error = %e, "Skipping unreadable package.json");
                    None
                }
            }
        });
        let registry = Self::from_entries(entries);
        debug!(packages = registry.len(), "Package registry loaded");
        registry
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn root_of(&self, name: &str) -> Option<&Path> {
        self.packages.get(name).map(PathBuf::as_path)
    }

    /// `name/tail` → `root/tail`. The longest matching name wins, so
    /// `@app/core-utils/x` never lands in `@app/core`.
    pub fn resolve(&self, specifier: &str) -> Option<PathBuf> {
        self.packages
            .iter()
            .filter_map(|(name, root)| {
                let tail = specifier.strip_prefix(name.as_str())?.strip_prefix('/')?;
                Some((name.len(), root, tail))
            })
            .max_by_key(|(len, _, _)| *len)
            .map(|(_, root, tail)| normalize_path(&root.join(tail)))
    }

    /// Package specifier for `target` as seen from `from_file`; only used when
    /// `from_file` lives outside the package. The deepest containing root wins.
    pub fn specifier_for(&self, from_file: &Path, target: &Path) -> Option<String> {
        self.packages
            .iter()
            .filter(|(_, root)| is_in_dir(root, target) && !is_in_dir(root, from_file))
            .max_by_key(|(_, root)| root.components().count())
            .and_then(|(name, root)| {
                let tail = to_unix(&relative_path(root, target));
                (!tail.is_empty()).then(|| format!("{}/{}", name, tail))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn registry() -> PackageRegistry {
        PackageRegistry::from_entries([
            ("@app/core".to_string(), PathBuf::from("/pkg/core")),
            ("@app/core-utils".to_string(), PathBuf::from("/pkg/core-utils")),
            ("@app/ui".to_string(), PathBuf::from("/pkg/ui")),
            ("@app/ui".to_string(), PathBuf::from("/legacy/ui")),
            ("@app/ui".to_string(), PathBuf::from("/third/ui")),
        ])
    }

    #[test]
    fn test_ambiguous_names_are_dropped() {
        let registry = registry();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.root_of("@app/ui"), None);
        assert_eq!(registry.resolve("@app/ui/button"), None);
    }

    #[test]
    fn test_resolve_prefers_longest_name() {
        let registry = registry();
        assert_eq!(
            registry.resolve("@app/core/x"),
            Some(PathBuf::from("/pkg/core/x"))
        );
        assert_eq!(
            registry.resolve("@app/core-utils/y"),
            Some(PathBuf::from("/pkg/core-utils/y"))
        );
        assert_eq!(registry.resolve("@app/core"), None);
        assert_eq!(registry.resolve("react"), None);
    }

    #[test]
    fn test_specifier_only_from_outside_the_package() {
        let registry = registry();
        assert_eq!(
            registry.specifier_for(Path::new("/pkg/ui/a.ts"), Path::new("/pkg/core/x")),
            Some("@app/core/x".to_string())
        );
        assert_eq!(
            registry.specifier_for(Path::new("/pkg/core/lib/a.ts"), Path::new("/pkg/core/x")),
            None
        );
    }

    #[test]
    fn test_deepest_root_wins() {
        let registry = PackageRegistry::from_entries([
            ("mono".to_string(), PathBuf::from("/repo")),
            ("@mono/core".to_string(), PathBuf::from("/repo/pkg/core")),
        ]);
        assert_eq!(
            registry.specifier_for(Path::new("/elsewhere/a.ts"), Path::new("/repo/pkg/core/x")),
            Some("@mono/core/x".to_string())
        );
    }
}
