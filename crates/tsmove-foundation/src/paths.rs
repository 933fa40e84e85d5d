//! Lexical path helpers
//!
//! Module resolution is purely lexical: `..` pops the previous component
//! without consulting the filesystem, exactly like a bundler joining a
//! specifier onto a directory. Nothing here touches the disk.

use std::path::{Component, Path, PathBuf};

/// Collapse `.` and `..` components without following symlinks.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // never pop past the root
                if !matches!(
                    result.components().next_back(),
                    None | Some(Component::RootDir) | Some(Component::Prefix(_))
                ) {
                    result.pop();
                }
            }
            _ => result.push(component.as_os_str()),
        }
    }
    if result.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        result
    }
}

/// Resolve `path` against `base` and normalize; absolute paths ignore `base`.
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    normalize_path(&base.join(path))
}

/// True when `path` is `dir` itself or lies underneath it.
///
/// Component-wise, so `/src/util2` is not inside `/src/util`.
pub fn is_in_dir(dir: &Path, path: &Path) -> bool {
    normalize_path(path).starts_with(normalize_path(dir))
}

/// Lexical relative path from `from_dir` to `to`, `""` when they are equal.
pub fn relative_path(from_dir: &Path, to: &Path) -> PathBuf {
    let from_dir = normalize_path(from_dir);
    let to = normalize_path(to);
    pathdiff::diff_paths(&to, &from_dir).unwrap_or(to)
}

/// Render a path with forward slashes regardless of the host separator.
pub fn to_unix(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_collapses_dots() {
        assert_eq!(
            normalize_path(Path::new("/src/util/../shared/./x")),
            PathBuf::from("/src/shared/x")
        );
        assert_eq!(normalize_path(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(normalize_path(Path::new("./")), PathBuf::from("."));
    }

    #[test]
    fn test_is_in_dir_is_component_wise() {
        assert!(is_in_dir(Path::new("/src/util"), Path::new("/src/util/x.ts")));
        assert!(is_in_dir(Path::new("/src/util"), Path::new("/src/util")));
        assert!(!is_in_dir(Path::new("/src/util"), Path::new("/src/util2/x.ts")));
        assert!(!is_in_dir(Path::new("/src/util"), Path::new("/src")));
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(
            relative_path(Path::new("/src/a"), Path::new("/src/b/c.ts")),
            PathBuf::from("../b/c.ts")
        );
        assert_eq!(
            relative_path(Path::new("/src"), Path::new("/src/util/x")),
            PathBuf::from("util/x")
        );
        assert_eq!(relative_path(Path::new("/src"), Path::new("/src")), PathBuf::new());
    }

    #[test]
    fn test_to_unix() {
        assert_eq!(to_unix(Path::new("a\\b/c")), "a/b/c");
    }
}
