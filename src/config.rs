// File: ./src/config.rs
// Handles configuration loading, saving, and defaults.
use crate::context::AppContext;
use crate::dates::Period;
use crate::model::ColumnMap;
use anyhow::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_comment_prefix() -> Option<char> {
    Some('#')
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Config {
    /// Path or URL loaded when the command line names none.
    #[serde(default)]
    pub default_source: Option<String>,
    #[serde(default = "default_comment_prefix")]
    pub comment_prefix: Option<char>,
    #[serde(default)]
    pub dynamic_typing: bool,
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
    #[serde(default)]
    pub default_period: Option<Period>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub columns: ColumnMap,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_source: None,
            // Match the serde defaults
            comment_prefix: Some('#'),
            dynamic_typing: false,
            fetch_timeout_secs: 30,
            default_period: None,
            log_level: "info".to_string(),
            columns: ColumnMap::default(),
        }
    }
}

fn atomic_write(path: &Path, contents: &str) -> Result<()> {
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, contents)?;
    fs::rename(tmp_path, path)?;
    Ok(())
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    /// Returns a contextualized error if reading or parsing fails.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;

        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        Ok(config)
    }

    /// Missing config is not an error for the CLI; it falls back to defaults.
    /// Checks the explicit message first, then the error chain for an IO NotFound.
    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }

        err.chain().any(|cause| {
            cause
                .downcast_ref::<std::io::Error>()
                .is_some_and(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
        })
    }

    /// Save configuration using an explicit context.
    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        let toml_str = toml::to_string_pretty(self)?;
        atomic_write(&path, &toml_str)?;
        Ok(())
    }

    /// Get the path string using an explicit context.
    pub fn get_path_string(ctx: &dyn AppContext) -> Result<String> {
        let path = ctx.get_config_file_path()?;
        Ok(path.to_string_lossy().to_string())
    }

    /// Unknown level names fall back to `Info`.
    pub fn log_level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or_else(|_| {
            eprintln!("Unknown log level '{}', using info", self.log_level);
            log::LevelFilter::Info
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TestContext;

    #[test]
    fn missing_file_is_detected() {
        let ctx = TestContext::new();
        let err = Config::load(&ctx).unwrap_err();
        assert!(Config::is_missing_config_error(&err));
    }

    #[test]
    fn partial_file_uses_defaults() {
        let ctx = TestContext::new();
        let path = ctx.get_config_file_path().unwrap();
        fs::write(
            &path,
            "default_period = \"last7days\"\n[columns]\nuser = \"owner\"\n",
        )
        .unwrap();

        let config = Config::load(&ctx).unwrap();
        assert_eq!(config.default_period, Some(Period::Last7Days));
        assert_eq!(config.columns.user, "owner");
        assert_eq!(config.columns.status, "status");
        assert_eq!(config.comment_prefix, Some('#'));
        assert_eq!(config.fetch_timeout_secs, 30);
    }

    #[test]
    fn save_then_load() {
        let ctx = TestContext::new();
        let config = Config {
            default_source: Some("https://example.com/leads.csv".into()),
            dynamic_typing: true,
            ..Config::default()
        };
        config.save(&ctx).unwrap();
        assert_eq!(Config::load(&ctx).unwrap(), config);
    }

    #[test]
    fn broken_toml_is_not_a_missing_file() {
        let ctx = TestContext::new();
        fs::write(ctx.get_config_file_path().unwrap(), "log_level = [").unwrap();
        let err = Config::load(&ctx).unwrap_err();
        assert!(!Config::is_missing_config_error(&err));
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn log_level_parsing() {
        let mut config = Config::default();
        assert_eq!(config.log_level_filter(), log::LevelFilter::Info);
        config.log_level = "debug".into();
        assert_eq!(config.log_level_filter(), log::LevelFilter::Debug);
        config.log_level = "loud".into();
        assert_eq!(config.log_level_filter(), log::LevelFilter::Info);
    }
}
