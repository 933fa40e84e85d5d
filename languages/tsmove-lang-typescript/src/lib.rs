//! TypeScript language support for tsmove
//!
//! Everything here is a leaf collaborator of the move engine:
//! - [`parser::TypeScriptImportParser`] extracts literal import/export specifiers via swc
//! - [`tsconfig::load_alias_config`] turns a `tsconfig.json` (with `extends`) into an alias table
//! - [`manifest::load_package_name`] reads the `name` of a `package.json`

pub mod manifest;
pub mod parser;
pub mod tsconfig;

pub use manifest::load_package_name;
pub use parser::TypeScriptImportParser;
pub use tsconfig::{load_alias_config, AliasConfig, AliasPattern};

/// Configuration file names probed in every directory, in priority order
pub const TSCONFIG_FILE_NAMES: &[&str] = &["tsconfig.json", "tsconfig.build.json"];

/// Workspace package manifest file name
pub const MANIFEST_FILE_NAME: &str = "package.json";
