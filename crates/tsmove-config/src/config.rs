//! Configuration management for tsmove

use serde::{Deserialize, Serialize};
use std::path::Path;
use tsmove_foundation::{MoveError, MoveResult};

/// Project configuration files, tried in order (first found wins)
const CONFIG_FILES: &[&str] = &["tsmove.toml", ".tsmove/config.toml"];

/// Prefix of environment variable overrides, e.g. `TSMOVE__SCAN__BATCH_SIZE=100`
const ENV_PREFIX: &str = "TSMOVE__";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Source scanning configuration
    #[serde(default)]
    pub scan: ScanConfig,
}

/// Log output format
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format for development
    #[default]
    Pretty,
    /// Structured JSON format
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

/// Source scanning configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanConfig {
    /// Files indexed between two cooperative yields
    pub batch_size: usize,
    /// Recognized source extensions, without the leading dot
    pub extensions: Vec<String>,
    /// Directory names never descended into
    pub excluded_dirs: Vec<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            batch_size: 50,
            extensions: vec!["ts".to_string(), "tsx".to_string()],
            excluded_dirs: vec![
                "node_modules".to_string(),
                ".git".to_string(),
                "jspm_packages".to_string(),
                "typings".to_string(),
            ],
        }
    }
}

impl AppConfig {
    /// Load configuration for a project rooted at `root`
    ///
    /// Configuration is loaded in the following priority order (highest to lowest):
    /// 1. Environment variables (TSMOVE__*, `__` separates nesting levels)
    /// 2. `tsmove.toml` or `.tsmove/config.toml` under `root`
    /// 3. Default values
    pub fn load(root: &Path) -> MoveResult<Self> {
        use figment::{
            providers::{Env, Format, Serialized, Toml},
            Figment,
        };

        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

        for candidate in CONFIG_FILES {
            let path = root.join(candidate);
            if path.exists() {
                tracing::info!(path = %path.display(), "Loading TOML configuration");
                figment = figment.merge(Toml::file(path));
                break;
            }
        }

        let figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let app_config: AppConfig = figment
            .extract()
            .map_err(|e| MoveError::config(format!("Failed to load configuration: {}", e)))?;

        app_config.validate()?;

        tracing::debug!(
            batch_size = app_config.scan.batch_size,
            extensions = ?app_config.scan.extensions,
            "Configuration loaded successfully"
        );

        Ok(app_config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> MoveResult<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(MoveError::config(format!(
                "Invalid log level '{}', must be one of: {}",
                self.logging.level,
                valid_levels.join(", ")
            )));
        }

        if self.scan.batch_size == 0 {
            return Err(MoveError::config("Scan batch size cannot be 0"));
        }

        if self.scan.extensions.is_empty() {
            return Err(MoveError::config(
                "At least one source extension must be configured",
            ));
        }

        if let Some(ext) = self.scan.extensions.iter().find(|e| e.starts_with('.')) {
            return Err(MoveError::config(format!(
                "Extension '{}' must be given without a leading dot",
                ext
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.scan.batch_size, 50);
        assert_eq!(config.scan.extensions, vec!["ts", "tsx"]);
    }

    // Loading reads TSMOVE__* variables, so every load test runs inside a
    // Jail to stay isolated from `test_env_overrides_file`.
    #[test]
    fn test_load_without_project_file_uses_defaults() {
        figment::Jail::expect_with(|jail| {
            let config = AppConfig::load(jail.directory()).map_err(|e| e.to_string())?;
            assert_eq!(config, AppConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_load_merges_project_toml() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "tsmove.toml",
                r#"
[scan]
batch_size = 10
extensions = ["ts", "tsx", "mts"]
excluded_dirs = ["node_modules"]

[logging]
level = "debug"
format = "json"
"#,
            )?;

            let config = AppConfig::load(jail.directory()).map_err(|e| e.to_string())?;
            assert_eq!(config.scan.batch_size, 10);
            assert_eq!(config.scan.extensions, vec!["ts", "tsx", "mts"]);
            assert_eq!(config.logging.level, "debug");
            assert_eq!(config.logging.format, LogFormat::Json);
            Ok(())
        });
    }

    #[test]
    fn test_invalid_level_is_rejected() {
        figment::Jail::expect_with(|jail| {
            std::fs::create_dir_all(jail.directory().join(".tsmove"))
                .map_err(|e| e.to_string())?;
            jail.create_file(".tsmove/config.toml", "[logging]\nlevel = \"loud\"\n")?;

            let err = AppConfig::load(jail.directory()).unwrap_err();
            assert!(err.to_string().contains("Invalid log level 'loud'"));
            Ok(())
        });
    }

    #[test]
    fn test_zero_batch_size_is_rejected() {
        let mut config = AppConfig::default();
        config.scan.batch_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_dotted_extension_is_rejected() {
        let mut config = AppConfig::default();
        config.scan.extensions = vec![".ts".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("tsmove.toml", "[scan]\nbatch_size = 10\n")?;
            jail.set_env("TSMOVE__SCAN__BATCH_SIZE", "7");

            let config = AppConfig::load(jail.directory()).map_err(|e| e.to_string())?;
            assert_eq!(config.scan.batch_size, 7);
            // untouched keys keep their defaults
            assert_eq!(config.scan.extensions, vec!["ts", "tsx"]);
            Ok(())
        });
    }
}
