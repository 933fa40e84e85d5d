//! Centralized logging initialization with environment variable support

use crate::{AppConfig, LogFormat};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing subscriber with environment variable support
///
/// Environment variables (in priority order):
/// - `RUST_LOG`: Standard Rust log filter (takes precedence over all)
/// - `LOG_FORMAT`: Override format (json, pretty)
///
/// # Examples
///
/// ```bash
/// # Trace every resolved specifier while moving
/// RUST_LOG=tsmove_services=debug tsmove move src/util src/shared/util
///
/// # Machine-readable logs
/// LOG_FORMAT=json tsmove move src/a.ts src/b.ts
/// ```
pub fn initialize(config: &AppConfig) {
    let log_level = config.logging.level.parse().unwrap_or(tracing::Level::INFO);

    // RUST_LOG directives are kept, the configured level is added as default
    let env_filter = EnvFilter::from_default_env().add_directive(log_level.into());

    let format = std::env::var("LOG_FORMAT")
        .ok()
        .and_then(|f| parse_format(&f))
        .unwrap_or_else(|| config.logging.format.clone());

    // Always stderr: stdout carries the move report
    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
                .init();
        }
    }
}

fn parse_format(value: &str) -> Option<LogFormat> {
    match value.to_lowercase().as_str() {
        "json" => Some(LogFormat::Json),
        "pretty" | "human" => Some(LogFormat::Pretty),
        _ => None,
    }
}

/// Span wrapping one move request; nested logs inherit `source` and `target`.
pub fn move_span(source: &std::path::Path, target: &std::path::Path) -> tracing::Span {
    tracing::info_span!(
        "move",
        source = %source.display(),
        target = %target.display()
    )
}
