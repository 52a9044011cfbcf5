use super::ExportConfig;

/// Characters that are illegal in file names on common filesystems
const ILLEGAL_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Replace filesystem-illegal characters (and control characters) with `_`
pub fn sanitize_label(label: &str) -> String {
    label
        .chars()
        .map(|c| {
            if ILLEGAL_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Build a per-chapter file name: `{stem?}_{0001?}_{label}.{ext}`
///
/// `index` is the chapter's 1-based position in the document.
pub fn build_name(index: usize, label: &str, config: &ExportConfig) -> String {
    let mut parts = Vec::with_capacity(3);
    if let Some(stem) = config.prefix_stem() {
        parts.push(sanitize_label(stem));
    }
    if config.use_index_prefix {
        parts.push(format!("{:04}", index));
    }
    parts.push(sanitize_label(label));

    format!("{}.{}", parts.join("_"), config.format.extension())
}

/// Build a file name for a multi-chapter unit: `{stem}-{label}.{ext}`
pub fn labeled_name(label: &str, config: &ExportConfig) -> String {
    let label = sanitize_label(label);
    match config.prefix_stem() {
        Some(stem) => format!(
            "{}-{}.{}",
            sanitize_label(stem),
            label,
            config.format.extension()
        ),
        None => format!("{}.{}", label, config.format.extension()),
    }
}

/// `{start}~{end}` with an optional suffix, used for merged and batch units
pub fn range_label(start: usize, end: usize, suffix: &str) -> String {
    format!("{}~{}{}", start, end, suffix)
}

/// `part_0001` style label for size-bounded parts
pub fn part_label(number: usize) -> String {
    format!("part_{:04}", number)
}
