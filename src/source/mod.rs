mod error;

#[cfg(test)]
mod tests;

pub use error::SourceError;

use encoding_rs::{Encoding, GB18030, UTF_16BE, UTF_16LE};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Text encoding a source file was decoded from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEncoding {
    Utf8,
    Utf8Bom,
    Utf16Le,
    Utf16Be,
    /// GB18030 (and its GBK subset), tried when the bytes are not UTF-8
    Gb18030,
    /// Neither UTF-8 nor GB18030, decoded with replacement characters
    Utf8Lossy,
}

/// A decoded document plus what is known about where it came from
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// Decoded text with `\n` line breaks
    pub text: String,
    /// File name without extension, used as the export name prefix
    pub stem: Option<String>,
    pub path: Option<PathBuf>,
    pub encoding: SourceEncoding,
}

impl SourceDocument {
    /// Read and decode a document from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| SourceError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;

        let (text, encoding) = decode(&bytes)?;
        if encoding == SourceEncoding::Utf8Lossy {
            warn!(
                path = %path.display(),
                "source is neither UTF-8 nor GB18030; undecodable bytes were replaced"
            );
        }

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_string);

        debug!(path = %path.display(), bytes = bytes.len(), ?encoding, "source loaded");

        Ok(Self {
            text: normalize_line_breaks(text),
            stem,
            path: Some(path.to_path_buf()),
            encoding,
        })
    }

    /// Wrap in-memory text, e.g. from a pipe
    pub fn from_text(text: impl Into<String>, stem: Option<String>) -> Self {
        Self {
            text: normalize_line_breaks(text.into()),
            stem,
            path: None,
            encoding: SourceEncoding::Utf8,
        }
    }
}

/// Decode raw bytes by byte-order mark, then UTF-8, then GB18030
///
/// Bytes that fit neither UTF-8 nor GB18030 are decoded as UTF-8 with
/// replacement characters.
pub fn decode(bytes: &[u8]) -> Result<(String, SourceEncoding), SourceError> {
    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return Ok(utf8(rest, SourceEncoding::Utf8Bom));
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        return Ok((utf16(rest, UTF_16LE)?, SourceEncoding::Utf16Le));
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        return Ok((utf16(rest, UTF_16BE)?, SourceEncoding::Utf16Be));
    }
    Ok(utf8(bytes, SourceEncoding::Utf8))
}

fn utf8(bytes: &[u8], encoding: SourceEncoding) -> (String, SourceEncoding) {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return (text.to_string(), encoding);
    }

    // GBK is a subset of GB18030
    if let Some(text) = GB18030.decode_without_bom_handling_and_without_replacement(bytes) {
        return (text.into_owned(), SourceEncoding::Gb18030);
    }

    (
        String::from_utf8_lossy(bytes).into_owned(),
        SourceEncoding::Utf8Lossy,
    )
}

fn utf16(bytes: &[u8], encoding: &'static Encoding) -> Result<String, SourceError> {
    if bytes.len() % 2 != 0 {
        return Err(SourceError::OddUtf16Length(bytes.len()));
    }

    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        warn!(encoding = encoding.name(), "unpaired surrogates were replaced");
    }
    Ok(text.into_owned())
}

/// Convert `\r\n` and lone `\r` to `\n`
pub fn normalize_line_breaks(text: String) -> String {
    if !text.contains('\r') {
        return text;
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}
