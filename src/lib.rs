// Public API exports
pub mod config;
pub mod export;
pub mod segment;
pub mod selection;
pub mod source;
pub mod writer;

// Re-export main types for convenience
pub use segment::{detect, Chapter, HeadingKind, PatternTable};

pub use export::{
    build_name, export_by_count, export_by_size, export_individual, export_merged, render,
    ExportConfig, ExportError, ExportUnit, OutputFormat,
};

pub use selection::{Selection, SelectionError};
pub use source::{SourceDocument, SourceEncoding, SourceError};
pub use writer::{UnitWriter, WriteReport};

pub use config::Config;
