//! Packaging selected chapters into export units
//!
//! Every strategy is a pure function from (document, chapters, selection,
//! config) to a list of [`ExportUnit`]s. Nothing here touches the
//! filesystem; see [`crate::writer`] for that.

mod config;
mod error;
mod naming;
mod render;
mod strategies;


use serde::Serialize;

pub use config::{
    megabytes_to_bytes, parse_batch_count, parse_size_limit_mb, ExportConfig, OutputFormat,
    DEFAULT_BATCH_COUNT, DEFAULT_SIZE_LIMIT_BYTES,
};
pub use error::ExportError;
pub use naming::{build_name, labeled_name, part_label, range_label, sanitize_label};
pub use render::render;
pub use strategies::{export_by_count, export_by_size, export_individual, export_merged};

/// One output payload, ready to be written
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportUnit {
    pub content: String,
    pub filename: String,
    /// 1-based document index of the first chapter in this unit
    pub first_chapter: usize,
    /// 1-based document index of the last chapter in this unit
    pub last_chapter: usize,
}
