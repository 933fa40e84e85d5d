//! From implementations for standard library types

use super::MoveError;

impl From<std::io::Error> for MoveError {
    fn from(err: std::io::Error) -> Self {
        MoveError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for MoveError {
    fn from(err: serde_json::Error) -> Self {
        MoveError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}
