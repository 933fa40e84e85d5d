//! package.json manifest handling
//!
//! Only the `name` field matters for the move engine: it is the prefix under
//! which sibling packages import each other (`@app/core/...`).

use serde::Deserialize;
use std::path::Path;
use tracing::debug;
use tsmove_foundation::{MoveError, MoveResult};

#[derive(Debug, Deserialize)]
struct PackageManifest {
    name: Option<String>,
}

/// Parse package.json content and return its non-empty `name`
pub fn parse_package_name(content: &str) -> MoveResult<Option<String>> {
    let manifest: PackageManifest = serde_json::from_str(content)?;
    Ok(manifest
        .name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty()))
}

/// Read a package.json file and return its `name`, if any
pub fn load_package_name(path: &Path) -> MoveResult<Option<String>> {
    let content = std::fs::read_to_string(path).map_err(|e| MoveError::io(path, e))?;

    let name = parse_package_name(&content).map_err(|e| {
        MoveError::manifest(path, format!("Failed to parse package.json: {}", e))
    })?;

    debug!(manifest = %path.display(), package = ?name, "Parsed package.json");
    Ok(name)
}
