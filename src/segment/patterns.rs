use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

/// Arabic, full-width and CJK numerals accepted in chapter markers
const NUMERAL: &str = "[0-9０-９零〇一二两三四五六七八九十百千万壹贰叁肆伍陆柒捌玖拾佰仟]+";

/// Suffixes that close a numbered marker (章 chapter, 节 section, 回 episode, ...)
const SUFFIX: &str = "[章节回集卷部篇]";

/// Pattern family that recognized a heading line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingKind {
    /// `第十二章 ...`, `第3回`, `第 7 节 ...`
    Numbered,
    /// `【第十章】`, `[第3章]`, `【12章】`
    Bracketed,
    /// `Chapter 4`, `CHAPTER IV`
    English,
    /// `1. ...`, `12、...`
    Enumerated,
}

impl HeadingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numbered => "numbered",
            Self::Bracketed => "bracketed",
            Self::English => "english",
            Self::Enumerated => "enumerated",
        }
    }
}

impl fmt::Display for HeadingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

static BUILTIN: Lazy<PatternTable> = Lazy::new(PatternTable::new);

/// Ordered list of heading patterns; the first family that matches a line wins
pub struct PatternTable {
    families: Vec<(HeadingKind, Regex)>,
}

impl PatternTable {
    /// Compile the built-in pattern families in priority order
    pub fn new() -> Self {
        let sources = [
            (
                HeadingKind::Numbered,
                format!(r"^\s*第\s*{NUMERAL}(?:\s*{SUFFIX}.*|\s.*|)$"),
            ),
            (
                HeadingKind::Bracketed,
                format!(
                    r"^\s*[【\[〔]\s*(?:第\s*{NUMERAL}\s*{SUFFIX}?|{NUMERAL}\s*{SUFFIX})\s*[】\]〕].*$"
                ),
            ),
            (
                HeadingKind::English,
                r"^\s*(?:Chapter|CHAPTER)\s+(?:\d+|[IVXLCDM]+)\b.*$".to_string(),
            ),
            (
                HeadingKind::Enumerated,
                r"^\s*[0-9０-９]+[.．、](?:[^0-9０-９].*)?$".to_string(),
            ),
        ];

        let families = sources
            .into_iter()
            .map(|(kind, source)| {
                let regex = Regex::new(&source).expect("built-in heading pattern must compile");
                (kind, regex)
            })
            .collect();

        Self { families }
    }

    /// Shared instance of the built-in table
    pub fn builtin() -> &'static PatternTable {
        &BUILTIN
    }

    /// Classify a single physical line (without its line terminator)
    pub fn classify(&self, line: &str) -> Option<HeadingKind> {
        if line.trim().is_empty() {
            return None;
        }

        self.families
            .iter()
            .find(|(_, regex)| regex.is_match(line))
            .map(|(kind, _)| *kind)
    }

    /// Number of pattern families in the table
    pub fn family_count(&self) -> usize {
        self.families.len()
    }
}

impl Default for PatternTable {
    fn default() -> Self {
        Self::new()
    }
}
