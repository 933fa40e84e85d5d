//! TypeScript Configuration Parser
//!
//! Parses tsconfig.json files into the alias table used for specifier
//! resolution. `extends` chains are followed and merged, child patterns
//! overriding parent patterns by key.

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;
use tsmove_foundation::paths::normalize_path;
use tsmove_foundation::{MoveError, MoveResult};

/// One wildcard pattern of `compilerOptions.paths`, e.g. `@app/*`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasPattern {
    /// Pattern text before the wildcard (`@app/`)
    pub prefix: String,
    /// Absolute directories substituted for the prefix, in declaration order
    pub mapped_dirs: Vec<PathBuf>,
}

impl AliasPattern {
    /// The wildcard tail of `specifier`, if this pattern applies to it
    pub fn match_tail<'s>(&self, specifier: &'s str) -> Option<&'s str> {
        specifier.strip_prefix(self.prefix.as_str())
    }
}

/// Alias configuration of one tsconfig file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasConfig {
    /// The tsconfig file this table was loaded from
    pub config_path: PathBuf,
    /// `configDir/baseUrl`, or the config directory without `baseUrl`
    pub base_dir: PathBuf,
    /// Valid patterns in file order
    pub patterns: Vec<AliasPattern>,
}

impl AliasConfig {
    /// Directory holding the tsconfig file
    pub fn config_dir(&self) -> &Path {
        self.config_path.parent().unwrap_or_else(|| Path::new("/"))
    }
}

/// Load the alias table of a tsconfig file.
///
/// Returns `Ok(None)` when the file does not exist. Patterns that are not
/// `prefix*`, and mapped entries that do not end in `*`, are dropped.
pub fn load_alias_config(path: &Path) -> MoveResult<Option<AliasConfig>> {
    if !path.is_file() {
        return Ok(None);
    }

    let resolved = TsConfig::load_and_merge(path)
        .map_err(|e| MoveError::config(format!("{:#}", e)))?;

    let mut patterns = Vec::with_capacity(resolved.paths.len());
    for (pattern, mapped) in resolved.paths {
        let Some(prefix) = wildcard_prefix(&pattern) else {
            debug!(config = %path.display(), pattern = %pattern, "Skipping non-wildcard path pattern");
            continue;
        };

        let mapped_dirs: Vec<PathBuf> = mapped
            .iter()
            .filter_map(|entry| {
                let text = entry.to_string_lossy();
                match wildcard_prefix(&text) {
                    Some(dir) => Some(normalize_path(Path::new(dir))),
                    None => {
                        debug!(config = %path.display(), pattern = %pattern, mapping = %text, "Skipping non-wildcard mapping");
                        None
                    }
                }
            })
            .collect();

        if mapped_dirs.is_empty() {
            continue;
        }

        patterns.push(AliasPattern {
            prefix: prefix.to_string(),
            mapped_dirs,
        });
    }

    Ok(Some(AliasConfig {
        config_path: normalize_path(path),
        base_dir: normalize_path(&resolved.base_url),
        patterns,
    }))
}

/// `"@app/*"` → `"@app/"`; anything with zero or several wildcards, or a
/// wildcard that is not last, yields `None`.
fn wildcard_prefix(pattern: &str) -> Option<&str> {
    let prefix = pattern.strip_suffix('*')?;
    if prefix.contains('*') {
        return None;
    }
    Some(prefix)
}

/// Represents a parsed tsconfig.json file
#[derive(Debug, Clone, Deserialize)]
struct TsConfig {
    /// Base configuration(s) to inherit from
    extends: Option<Extends>,

    /// Compiler options including path mappings
    #[serde(rename = "compilerOptions")]
    compiler_options: Option<CompilerOptions>,
}

/// `extends` accepts a single path or, since TypeScript 5.0, a list
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Extends {
    One(String),
    Many(Vec<String>),
}

impl Extends {
    fn entries(&self) -> Vec<&str> {
        match self {
            Extends::One(path) => vec![path.as_str()],
            Extends::Many(paths) => paths.iter().map(String::as_str).collect(),
        }
    }
}

/// TypeScript compiler options
#[derive(Debug, Clone, Deserialize)]
struct CompilerOptions {
    /// Base URL for resolving non-relative module names
    #[serde(rename = "baseUrl")]
    base_url: Option<String>,

    /// Path mappings for module resolution
    /// Example: { "$lib/*": ["src/lib/*"], "@/*": ["src/*"] }
    ///
    /// IndexMap keeps declaration order, first matching pattern wins.
    paths: Option<IndexMap<String, Vec<String>>>,
}

/// Resolved TypeScript configuration with absolute paths
#[derive(Debug, Clone)]
struct ResolvedTsConfig {
    /// Effective base URL (absolute path)
    base_url: PathBuf,

    /// Path mappings with absolute replacement paths
    paths: IndexMap<String, Vec<PathBuf>>,

    /// Raw base URL string (used for inheritance)
    raw_base_url: Option<String>,
}

impl ResolvedTsConfig {
    fn empty(config_dir: &Path) -> Self {
        Self {
            base_url: config_dir.to_path_buf(),
            paths: IndexMap::new(),
            raw_base_url: None,
        }
    }
}

impl TsConfig {
    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read tsconfig at {}", path.display()))?;

        serde_json::from_str(&sanitize_jsonc(&content))
            .with_context(|| format!("Failed to parse tsconfig at {}", path.display()))
    }

    fn load_and_merge(path: &Path) -> Result<ResolvedTsConfig> {
        let mut visited = HashSet::new();
        Self::load_and_merge_recursive(path, &mut visited)
    }

    fn load_and_merge_recursive(
        path: &Path,
        visited: &mut HashSet<PathBuf>,
    ) -> Result<ResolvedTsConfig> {
        // canonical paths only guard the cycle check; resolved directories
        // stay lexical so they compare equal to traversal output
        let canonical_path = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        if !visited.insert(canonical_path.clone()) {
            anyhow::bail!("Circular extends dependency detected: {}", path.display());
        }

        // `visited` holds the current chain only, so shared bases are fine
        let result = Self::merge_file(path, visited);
        visited.remove(&canonical_path);
        result
    }

    fn merge_file(path: &Path, visited: &mut HashSet<PathBuf>) -> Result<ResolvedTsConfig> {
        let config = Self::from_file(path)?;
        let config_dir = normalize_path(path.parent().unwrap_or_else(|| Path::new("/")));

        // 1. Load base configs; later entries override earlier ones
        let mut resolved = ResolvedTsConfig::empty(&config_dir);
        if let Some(extends) = &config.extends {
            for entry in extends.entries() {
                let Some(base_path) = locate_extended(&config_dir, entry) else {
                    debug!(config = %path.display(), extends = %entry, "Skipping unresolvable extends entry");
                    continue;
                };
                let base = Self::load_and_merge_recursive(&base_path, visited)?;
                resolved.base_url = base.base_url;
                if base.raw_base_url.is_some() {
                    resolved.raw_base_url = base.raw_base_url;
                }
                resolved.paths.extend(base.paths);
            }
        }

        // 2. Determine effective raw baseUrl (local overrides parent)
        let local_base_url = config
            .compiler_options
            .as_ref()
            .and_then(|opts| opts.base_url.clone());
        let inherited = resolved.raw_base_url.is_some() && local_base_url.is_none();
        let effective_raw_base_url = local_base_url.or(resolved.raw_base_url.take());

        // 3. Absolute baseUrl for THIS config file; an inherited baseUrl keeps
        //    the directory of the config that declared it
        let effective_base_url = match (&effective_raw_base_url, inherited) {
            (Some(_), true) => resolved.base_url.clone(),
            (Some(raw), false) => normalize_path(&config_dir.join(raw)),
            (None, _) => config_dir.clone(),
        };

        resolved.base_url = effective_base_url.clone();
        resolved.raw_base_url = effective_raw_base_url;

        // 4. Resolve and merge paths
        if let Some(paths) = config.compiler_options.and_then(|opts| opts.paths) {
            for (pattern, replacements) in paths {
                let abs_replacements: Vec<PathBuf> = replacements
                    .into_iter()
                    .map(|r| effective_base_url.join(r))
                    .collect();

                // Child paths override parent paths (merge by key)
                resolved.paths.insert(pattern, abs_replacements);
            }
        }

        Ok(resolved)
    }
}

/// Find the file an `extends` entry points at. Package-style entries
/// (`@tsconfig/node18/tsconfig.json`) live in node_modules and are not followed.
fn locate_extended(config_dir: &Path, entry: &str) -> Option<PathBuf> {
    let is_path = entry.starts_with('.') || Path::new(entry).is_absolute();
    if !is_path {
        return None;
    }

    let candidate = normalize_path(&config_dir.join(entry));
    if candidate.is_file() {
        return Some(candidate);
    }

    let with_json = PathBuf::from(format!("{}.json", candidate.display()));
    with_json.is_file().then_some(with_json)
}

/// Make tsconfig content acceptable to a strict JSON parser: remove `//`
/// and `/* */` comments, then trailing commas before `}` or `]`.
pub fn sanitize_jsonc(content: &str) -> String {
    strip_trailing_commas(&strip_json_comments(content))
}

/// Strip JSON comments from content
///
/// TypeScript's tsconfig.json allows JavaScript-style comments (//, /* */),
/// but standard JSON parsers don't support them.
fn strip_json_comments(content: &str) -> String {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    let mut in_string = false;
    let mut in_line_comment = false;
    let mut in_block_comment = false;
    let mut escape_next = false;

    while let Some(ch) = chars.next() {
        if in_line_comment {
            if ch == '\n' {
                in_line_comment = false;
                result.push(ch);
            }
            continue;
        }

        if in_block_comment {
            if ch == '*' && chars.peek() == Some(&'/') {
                in_block_comment = false;
                chars.next();
            }
            continue;
        }

        if in_string {
            result.push(ch);
            if escape_next {
                escape_next = false;
            } else if ch == '\\' {
                escape_next = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match (ch, chars.peek()) {
            ('"', _) => {
                in_string = true;
                result.push(ch);
            }
            ('/', Some('/')) => {
                in_line_comment = true;
                chars.next();
            }
            ('/', Some('*')) => {
                in_block_comment = true;
                chars.next();
            }
            _ => result.push(ch),
        }
    }

    result
}

fn strip_trailing_commas(content: &str) -> String {
    let chars: Vec<char> = content.chars().collect();
    let mut result = String::with_capacity(content.len());
    let mut in_string = false;
    let mut escape_next = false;

    for (i, &ch) in chars.iter().enumerate() {
        if in_string {
            if escape_next {
                escape_next = false;
            } else if ch == '\\' {
                escape_next = true;
            } else if ch == '"' {
                in_string = false;
            }
            result.push(ch);
            continue;
        }

        if ch == '"' {
            in_string = true;
        } else if ch == ',' {
            let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
            if matches!(next, Some('}') | Some(']')) {
                continue;
            }
        }
        result.push(ch);
    }

    result
}
