use std::collections::HashSet;
use tracing::{debug, warn};

use super::naming::{build_name, labeled_name, part_label, range_label};
use super::{render, ExportConfig, ExportError, ExportUnit, OutputFormat};
use crate::segment::Chapter;

/// Separator between chapters inside one part or batch
const CHAPTER_SEPARATOR: &str = "\n\n";

/// Separator between chapters of a plain merged file
const PLAIN_MERGE_SEPARATOR: &str = "\n\n---\n\n";

/// Suffix for batch labels, e.g. `11~20章`
const BATCH_SUFFIX: &str = "章";

/// A chapter picked for export, with its 1-based position in the document
#[derive(Debug, Clone, Copy)]
struct Picked<'c> {
    number: usize,
    chapter: &'c Chapter,
}

/// Resolve 0-based selection indices against the detected chapters
fn pick<'c>(chapters: &'c [Chapter], selected: &[usize]) -> Result<Vec<Picked<'c>>, ExportError> {
    if selected.is_empty() {
        return Err(ExportError::NothingToExport);
    }

    selected
        .iter()
        .map(|&index| {
            chapters
                .get(index)
                .map(|chapter| Picked {
                    number: index + 1,
                    chapter,
                })
                .ok_or(ExportError::SelectionOutOfRange {
                    index: index + 1,
                    total: chapters.len(),
                })
        })
        .collect()
}

/// One file per selected chapter
///
/// Names use the chapter's position in the document, not in the selection.
/// When two chapters would produce the same name, the later one gets the
/// index component forced on (and a counter, if that is still taken).
pub fn export_individual(
    document: &str,
    chapters: &[Chapter],
    selected: &[usize],
    config: &ExportConfig,
) -> Result<Vec<ExportUnit>, ExportError> {
    let picked = pick(chapters, selected)?;
    let mut taken: HashSet<String> = HashSet::with_capacity(picked.len());

    let units: Vec<ExportUnit> = picked
        .iter()
        .map(|p| {
            let filename = unique_name(p, config, &mut taken);
            ExportUnit {
                content: render(document, p.chapter, config.format),
                filename,
                first_chapter: p.number,
                last_chapter: p.number,
            }
        })
        .collect();

    debug!(units = units.len(), "individual export prepared");
    Ok(units)
}

fn unique_name(picked: &Picked<'_>, config: &ExportConfig, taken: &mut HashSet<String>) -> String {
    let natural = build_name(picked.number, &picked.chapter.title, config);
    if taken.insert(natural.clone()) {
        return natural;
    }

    let indexed = config.clone().use_index_prefix(true);
    let mut candidate = build_name(picked.number, &picked.chapter.title, &indexed);
    let mut attempt = 2;
    while !taken.insert(candidate.clone()) {
        let label = format!("{} ({})", picked.chapter.title, attempt);
        candidate = build_name(picked.number, &label, &indexed);
        attempt += 1;
    }

    warn!(
        chapter = picked.number,
        original = %natural,
        renamed = %candidate,
        "file name collision resolved"
    );
    candidate
}

/// `labeled_name`, with a ` (n)` counter when the name is already taken
fn unique_labeled_name(label: &str, config: &ExportConfig, taken: &mut HashSet<String>) -> String {
    let natural = labeled_name(label, config);
    let mut candidate = natural.clone();
    let mut attempt = 2;
    while !taken.insert(candidate.clone()) {
        candidate = labeled_name(&format!("{} ({})", label, attempt), config);
        attempt += 1;
    }

    if candidate != natural {
        warn!(original = %natural, renamed = %candidate, "file name collision resolved");
    }
    candidate
}

/// All selected chapters in one file
pub fn export_merged(
    document: &str,
    chapters: &[Chapter],
    selected: &[usize],
    config: &ExportConfig,
) -> Result<ExportUnit, ExportError> {
    let picked = pick(chapters, selected)?;

    let separator = match config.format {
        OutputFormat::Plain => PLAIN_MERGE_SEPARATOR,
        OutputFormat::Structured => CHAPTER_SEPARATOR,
    };
    let content = picked
        .iter()
        .map(|p| render(document, p.chapter, config.format))
        .collect::<Vec<_>>()
        .join(separator);

    // pick() never returns an empty selection
    let first = picked.first().map(|p| p.number).unwrap_or_default();
    let last = picked.last().map(|p| p.number).unwrap_or_default();

    debug!(chapters = picked.len(), bytes = content.len(), "merged export prepared");
    Ok(ExportUnit {
        content,
        filename: labeled_name(&range_label(first, last, ""), config),
        first_chapter: first,
        last_chapter: last,
    })
}

/// Buffer of rendered chapters accumulated into one size-bounded part
#[derive(Debug)]
struct Part {
    content: String,
    first: usize,
    last: usize,
}

impl Part {
    fn start(text: String, number: usize) -> Self {
        Self {
            content: text,
            first: number,
            last: number,
        }
    }

    /// Whether `text` can be appended without exceeding `limit` bytes
    fn fits(&self, text: &str, limit: u64) -> bool {
        if self.content.is_empty() {
            return true;
        }
        let combined = self.content.len() + CHAPTER_SEPARATOR.len() + text.len();
        combined as u64 <= limit
    }

    fn append(&mut self, text: &str, number: usize) {
        self.content.push_str(CHAPTER_SEPARATOR);
        self.content.push_str(text);
        self.last = number;
    }
}

/// Greedily pack chapters into parts of at most `size_limit_bytes` (UTF-8)
///
/// A chapter that is larger than the limit on its own becomes its own part.
pub fn export_by_size(
    document: &str,
    chapters: &[Chapter],
    selected: &[usize],
    config: &ExportConfig,
) -> Result<Vec<ExportUnit>, ExportError> {
    let limit = config.validate_size_limit()?;
    let picked = pick(chapters, selected)?;

    // The last part is the open buffer; starting a new part flushes it
    let parts = picked.iter().fold(Vec::<Part>::new(), |mut parts, p| {
        let text = render(document, p.chapter, config.format);
        match parts.last_mut() {
            Some(open) if open.fits(&text, limit) => open.append(&text, p.number),
            _ => parts.push(Part::start(text, p.number)),
        }
        parts
    });

    let units: Vec<ExportUnit> = parts
        .into_iter()
        .enumerate()
        .map(|(i, part)| ExportUnit {
            filename: labeled_name(&part_label(i + 1), config),
            content: part.content,
            first_chapter: part.first,
            last_chapter: part.last,
        })
        .collect();

    debug!(parts = units.len(), limit, "size-bounded export prepared");
    Ok(units)
}

/// Group chapters into consecutive batches of `batch_count`
///
/// Batches that would share a name (a chapter selected twice) get a counter.
pub fn export_by_count(
    document: &str,
    chapters: &[Chapter],
    selected: &[usize],
    config: &ExportConfig,
) -> Result<Vec<ExportUnit>, ExportError> {
    let batch_count = config.validate_batch_count()?;
    let picked = pick(chapters, selected)?;
    let mut taken: HashSet<String> = HashSet::new();

    let units: Vec<ExportUnit> = picked
        .chunks(batch_count)
        .map(|batch| {
            let first = batch[0].number;
            let last = batch[batch.len() - 1].number;
            let content = batch
                .iter()
                .map(|p| render(document, p.chapter, config.format))
                .collect::<Vec<_>>()
                .join(CHAPTER_SEPARATOR);

            ExportUnit {
                content,
                filename: unique_labeled_name(
                    &range_label(first, last, BATCH_SUFFIX),
                    config,
                    &mut taken,
                ),
                first_chapter: first,
                last_chapter: last,
            }
        })
        .collect();

    debug!(batches = units.len(), batch_count, "count-bounded export prepared");
    Ok(units)
}
