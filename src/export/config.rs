use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ExportError;

/// Default size limit for size-bounded parts (1 MiB)
pub const DEFAULT_SIZE_LIMIT_BYTES: u64 = 1024 * 1024;

/// Default number of chapters per count-bounded batch
pub const DEFAULT_BATCH_COUNT: usize = 10;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// How chapter content is rendered, which also decides the file extension
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Raw chapter text, `.txt`
    #[default]
    #[serde(rename = "txt", alias = "plain")]
    Plain,
    /// Markdown heading plus body, `.md`
    #[serde(rename = "md", alias = "markdown", alias = "structured")]
    Structured,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Plain => "txt",
            Self::Structured => "md",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "txt" | "plain" | "text" => Ok(Self::Plain),
            "md" | "markdown" | "structured" => Ok(Self::Structured),
            other => Err(format!("unknown output format: {} (expected txt or md)", other)),
        }
    }
}

/// Settings for a single export operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    pub format: OutputFormat,
    /// Stem of the source file name, e.g. `book` for `book.txt`
    pub source_stem: Option<String>,
    pub use_source_prefix: bool,
    pub use_index_prefix: bool,
    pub size_limit_bytes: u64,
    pub batch_count: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Plain,
            source_stem: None,
            use_source_prefix: true,
            use_index_prefix: false,
            size_limit_bytes: DEFAULT_SIZE_LIMIT_BYTES,
            batch_count: DEFAULT_BATCH_COUNT,
        }
    }
}

impl ExportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn source_stem(mut self, stem: impl Into<String>) -> Self {
        self.source_stem = Some(stem.into());
        self
    }

    pub fn use_source_prefix(mut self, enabled: bool) -> Self {
        self.use_source_prefix = enabled;
        self
    }

    pub fn use_index_prefix(mut self, enabled: bool) -> Self {
        self.use_index_prefix = enabled;
        self
    }

    pub fn size_limit_bytes(mut self, limit: u64) -> Self {
        self.size_limit_bytes = limit;
        self
    }

    pub fn batch_count(mut self, count: usize) -> Self {
        self.batch_count = count;
        self
    }

    /// Stem to prefix file names with, if enabled and known
    pub fn prefix_stem(&self) -> Option<&str> {
        if !self.use_source_prefix {
            return None;
        }
        self.source_stem
            .as_deref()
            .map(str::trim)
            .filter(|stem| !stem.is_empty())
    }

    pub(crate) fn validate_size_limit(&self) -> Result<u64, ExportError> {
        if self.size_limit_bytes == 0 {
            return Err(ExportError::InvalidSizeLimit("0 bytes".to_string()));
        }
        Ok(self.size_limit_bytes)
    }

    pub(crate) fn validate_batch_count(&self) -> Result<usize, ExportError> {
        if self.batch_count == 0 {
            return Err(ExportError::InvalidBatchCount("0".to_string()));
        }
        Ok(self.batch_count)
    }
}

/// Convert a size in megabytes (MiB) to a byte limit
pub fn megabytes_to_bytes(megabytes: f64) -> Result<u64, ExportError> {
    if !megabytes.is_finite() || megabytes <= 0.0 {
        return Err(ExportError::InvalidSizeLimit(format!("{} MB", megabytes)));
    }

    let bytes = (megabytes * BYTES_PER_MB).round() as u64;
    if bytes == 0 {
        return Err(ExportError::InvalidSizeLimit(format!("{} MB", megabytes)));
    }
    Ok(bytes)
}

/// Parse a user-entered size limit in megabytes, e.g. `"1.5"`
pub fn parse_size_limit_mb(input: &str) -> Result<u64, ExportError> {
    let megabytes: f64 = input
        .trim()
        .parse()
        .map_err(|_| ExportError::InvalidSizeLimit(format!("{:?}", input)))?;
    megabytes_to_bytes(megabytes)
}

/// Parse a user-entered chapters-per-batch count
pub fn parse_batch_count(input: &str) -> Result<usize, ExportError> {
    let count: i64 = input
        .trim()
        .parse()
        .map_err(|_| ExportError::InvalidBatchCount(format!("{:?}", input)))?;
    if count <= 0 {
        return Err(ExportError::InvalidBatchCount(count.to_string()));
    }
    usize::try_from(count).map_err(|_| ExportError::InvalidBatchCount(count.to_string()))
}
