//! Error handling for tsmove
//!
//! `MoveError` is the single error type crossing crate boundaries. Variants map
//! onto the move taxonomy:
//! - `TargetExists` / `SourceNotFound` are validation failures and stop a move
//!   before anything is mutated.
//! - `Io`, `Parse`, `Json` describe per-file failures; scanners and rewriters
//!   log them and carry on with the next file.
//! - `Config`, `Manifest` come from project configuration loading.

mod conversions;

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for convenience
pub type MoveResult<T> = Result<T, MoveError>;

/// Core error type used throughout tsmove
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum MoveError {
    #[error("Target already exists: {}", path.display())]
    TargetExists { path: PathBuf },

    #[error("Source does not exist: {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("I/O error: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("Parse error: {message}")]
    Parse {
        message: String,
        file: Option<PathBuf>,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Manifest error: {message}")]
    Manifest {
        message: String,
        path: Option<PathBuf>,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl MoveError {
    /// Create a target-exists error
    pub fn target_exists(path: impl Into<PathBuf>) -> Self {
        Self::TargetExists { path: path.into() }
    }

    /// Create a source-not-found error
    pub fn source_not_found(path: impl Into<PathBuf>) -> Self {
        Self::SourceNotFound { path: path.into() }
    }

    /// Create an I/O error attached to a path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        Self::Io {
            message: format!("{}: {}", path.display(), source),
            path: Some(path),
            source: Some(source),
        }
    }

    /// Create a parse error for a file
    pub fn parse(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            file: Some(file.into()),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a manifest error
    pub fn manifest(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Manifest {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
