mod chapter;
mod patterns;

#[cfg(test)]
mod tests;

pub use chapter::Chapter;
pub use patterns::{HeadingKind, PatternTable};

use tracing::debug;

/// Detect chapters using the built-in pattern families
///
/// Text before the first heading is not part of any chapter. Returns an empty
/// vector when no heading line is found.
pub fn detect(document: &str) -> Vec<Chapter> {
    PatternTable::builtin().detect(document)
}

impl PatternTable {
    /// Scan `document` line by line and emit one chapter per heading line
    pub fn detect(&self, document: &str) -> Vec<Chapter> {
        let mut chapters: Vec<Chapter> = lines_with_offsets(document)
            .filter_map(|(start, line)| {
                self.classify(line).map(|kind| Chapter {
                    title: line.trim().to_string(),
                    start,
                    end: document.len(),
                    kind,
                })
            })
            .collect();

        // Each chapter runs up to the next heading
        let next_starts: Vec<usize> = chapters.iter().skip(1).map(|c| c.start).collect();
        for (chapter, next_start) in chapters.iter_mut().zip(next_starts) {
            chapter.end = next_start;
        }

        debug!(
            chapters = chapters.len(),
            bytes = document.len(),
            "chapter detection finished"
        );

        chapters
    }
}

/// Physical lines paired with the byte offset they start at
fn lines_with_offsets(text: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut offset = 0;
    text.split_inclusive('\n').map(move |raw| {
        let start = offset;
        offset += raw.len();
        (start, raw.trim_end_matches(|c: char| c == '\n' || c == '\r'))
    })
}
