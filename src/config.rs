//! Configuration file (`chaptersplit.toml`)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::export::{
    megabytes_to_bytes, ExportConfig, ExportError, OutputFormat, DEFAULT_BATCH_COUNT,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub export: ExportSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Export defaults; command-line flags override these
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSettings {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default = "default_true")]
    pub use_source_prefix: bool,
    #[serde(default)]
    pub use_index_prefix: bool,
    /// Size limit for size-bounded parts, in megabytes
    #[serde(default = "default_size_limit_mb")]
    pub size_limit_mb: f64,
    #[serde(default = "default_batch_count")]
    pub batch_count: usize,
}

fn default_true() -> bool {
    true
}

fn default_size_limit_mb() -> f64 {
    1.0
}

fn default_batch_count() -> usize {
    DEFAULT_BATCH_COUNT
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            use_source_prefix: default_true(),
            use_index_prefix: false,
            size_limit_mb: default_size_limit_mb(),
            batch_count: default_batch_count(),
        }
    }
}

impl ExportSettings {
    /// Build an export config for a document with the given file stem
    pub fn to_export_config(&self, stem: Option<&str>) -> Result<ExportConfig, ExportError> {
        let mut config = ExportConfig::new()
            .format(self.format)
            .use_source_prefix(self.use_source_prefix)
            .use_index_prefix(self.use_index_prefix)
            .size_limit_bytes(megabytes_to_bytes(self.size_limit_mb)?)
            .batch_count(self.batch_count);
        config.source_stem = stem.map(str::to_string);
        Ok(config)
    }
}

/// Log severity level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,
}

impl Config {
    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Invalid config file '{}'", path.display()))
    }

    /// Load `path` if it exists, otherwise use defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all fields, reporting every problem at once
    pub fn validate(&self) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();

        if !self.export.size_limit_mb.is_finite() || self.export.size_limit_mb <= 0.0 {
            errors.push(format!(
                "export.size_limit_mb must be positive (got {})",
                self.export.size_limit_mb
            ));
        }
        if self.export.batch_count == 0 {
            errors.push("export.batch_count must be positive".to_string());
        }

        if !errors.is_empty() {
            anyhow::bail!("Configuration errors:\n  - {}", errors.join("\n  - "));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_file() {
        let config = Config::from_toml("").unwrap();

        assert_eq!(config.export.format, OutputFormat::Plain);
        assert!(config.export.use_source_prefix);
        assert!(!config.export.use_index_prefix);
        assert_eq!(config.export.batch_count, 10);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn test_parse_full_file() {
        let toml = r#"
            [export]
            format = "md"
            use_source_prefix = false
            use_index_prefix = true
            size_limit_mb = 0.5
            batch_count = 25

            [logging]
            level = "debug"
        "#;

        let config = Config::from_toml(toml).unwrap();
        let export = config.export.to_export_config(Some("book")).unwrap();

        assert_eq!(export.format, OutputFormat::Structured);
        assert!(!export.use_source_prefix);
        assert!(export.use_index_prefix);
        assert_eq!(export.size_limit_bytes, 512 * 1024);
        assert_eq!(export.batch_count, 25);
        assert_eq!(export.source_stem.as_deref(), Some("book"));
        assert_eq!(config.logging.level, LogLevel::Debug);
    }

    #[test]
    fn test_format_aliases() {
        let config = Config::from_toml("[export]\nformat = \"markdown\"").unwrap();
        assert_eq!(config.export.format, OutputFormat::Structured);
    }

    #[test]
    fn test_validation_collects_errors() {
        let toml = "[export]\nsize_limit_mb = -1.0\nbatch_count = 0";
        let err = Config::from_toml(toml).unwrap_err();
        let message = format!("{:#}", err);

        assert!(message.contains("size_limit_mb"));
        assert!(message.contains("batch_count"));
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.export.size_limit_mb, 1.0);
    }
}
