//! Configuration management for tsmove
//!
//! - `config`: layered `AppConfig` loading (defaults, project file, environment)
//! - `logging`: tracing subscriber initialization

pub mod config;
pub mod logging;

pub use config::{AppConfig, LogFormat, LoggingConfig, ScanConfig};
