use serde::Serialize;

use super::HeadingKind;

/// A contiguous, titled span of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chapter {
    /// Heading line, trimmed of surrounding whitespace
    pub title: String,
    /// Byte offset where the heading line begins
    pub start: usize,
    /// Byte offset where the chapter ends (next chapter's start, or document length)
    pub end: usize,
    /// Pattern family that recognized the heading
    pub kind: HeadingKind,
}

impl Chapter {
    /// Borrow this chapter's raw text out of the document it was detected in
    pub fn slice<'d>(&self, document: &'d str) -> &'d str {
        &document[self.start..self.end]
    }

    /// Size of the raw span in bytes
    pub fn byte_len(&self) -> usize {
        self.end - self.start
    }
}
