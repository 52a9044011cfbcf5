use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    #[error("Invalid size limit: {0} (must be a positive number)")]
    InvalidSizeLimit(String),

    #[error("Invalid batch count: {0} (must be a positive integer)")]
    InvalidBatchCount(String),

    #[error("Nothing to export: no chapters selected")]
    NothingToExport,

    #[error("Chapter {index} is out of range ({total} chapters detected)")]
    SelectionOutOfRange { index: usize, total: usize },
}

impl ExportError {
    /// Soft errors are informational no-ops rather than failures
    pub fn is_soft(&self) -> bool {
        matches!(self, Self::NothingToExport)
    }
}
