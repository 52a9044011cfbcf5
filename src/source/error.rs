use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed UTF-16 text: {0} bytes after the byte-order mark is not even")]
    OddUtf16Length(usize),
}
