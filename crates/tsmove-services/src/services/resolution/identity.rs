//! File identity: the key of the reference index

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tsmove_foundation::paths::{normalize_path, to_unix};

const DECLARATION_SUFFIX: &str = ".d.ts";
const INDEX_STEM: &str = "index";

/// Recognized source extensions, stored without the leading dot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceExtensions(Vec<String>);

impl SourceExtensions {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            extensions
                .into_iter()
                .map(|e| e.into().trim_start_matches('.').to_string())
                .collect(),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Whether the file name carries a recognized extension (`.d.ts` included)
    pub fn is_source(&self, path: &Path) -> bool {
        path.file_name()
            .map(|name| self.strip_suffix(&name.to_string_lossy()).is_some())
            .unwrap_or(false)
    }

    /// `util.d.ts` → `util`, `a.tsx` → `a`; `None` for anything unrecognized
    pub fn strip_suffix<'s>(&self, text: &'s str) -> Option<&'s str> {
        if let Some(stem) = text.strip_suffix(DECLARATION_SUFFIX) {
            if self.0.iter().any(|e| e == "ts") {
                return Some(stem);
            }
        }
        self.0.iter().find_map(|ext| {
            text.strip_suffix(ext.as_str())
                .and_then(|rest| rest.strip_suffix('.'))
        })
    }

    /// Strip a recognized extension from a specifier or path string
    pub fn remove_extension(&self, text: &str) -> String {
        self.strip_suffix(text).unwrap_or(text).to_string()
    }
}

impl Default for SourceExtensions {
    fn default() -> Self {
        Self::new(["ts", "tsx"])
    }
}

/// An absolute, extension-normalized module path.
///
/// `/src/util.ts`, `/src/util/index.ts` and the specifier target `/src/util`
/// all share the identity `/src/util`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FileIdentity(PathBuf);

impl FileIdentity {
    /// Identity of a concrete (or prospective) file path
    pub fn from_path(path: &Path, extensions: &SourceExtensions) -> Self {
        let normalized = normalize_path(path);
        let text = normalized.to_string_lossy();
        let stripped = PathBuf::from(extensions.strip_suffix(&text).unwrap_or(&text));

        let identity = if stripped.file_name().is_some_and(|name| name == INDEX_STEM) {
            stripped
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or(stripped)
        } else {
            stripped
        };
        Self(identity)
    }

    /// Identity of the file a resolved specifier points at.
    ///
    /// Probes `<path>`, `<path>.<ext>` and `<path>/index.<ext>` on disk; a target
    /// that does not exist yet is normalized lexically.
    pub fn from_target(path: &Path, extensions: &SourceExtensions) -> Self {
        Self::from_path(&locate_module(path, extensions).unwrap_or_else(|| path.to_path_buf()), extensions)
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for FileIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_unix(&self.0))
    }
}

/// First existing file a module path denotes, if any
pub fn locate_module(path: &Path, extensions: &SourceExtensions) -> Option<PathBuf> {
    if path.is_file() {
        return Some(path.to_path_buf());
    }
    let text = path.to_string_lossy();
    extensions
        .iter()
        .map(|ext| PathBuf::from(format!("{}.{}", text, ext)))
        .chain(
            extensions
                .iter()
                .map(|ext| path.join(format!("{}.{}", INDEX_STEM, ext))),
        )
        .find(|candidate| candidate.is_file())
}
