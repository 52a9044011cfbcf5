use super::OutputFormat;
use crate::segment::Chapter;

/// Render a chapter's text for the given output format
///
/// Plain output is the trimmed raw slice. Structured output always starts
/// with a `# {title}` heading; if the slice already begins with the title
/// line, that line is dropped so the title appears once.
pub fn render(document: &str, chapter: &Chapter, format: OutputFormat) -> String {
    let raw = chapter.slice(document).trim();

    match format {
        OutputFormat::Plain => raw.to_string(),
        OutputFormat::Structured => {
            let body = strip_title_line(raw, &chapter.title);
            format!("# {}\n\n{}", chapter.title, body)
        }
    }
}

fn strip_title_line<'a>(raw: &'a str, title: &str) -> &'a str {
    let (first, rest) = raw.split_once('\n').unwrap_or((raw, ""));

    if first.trim().to_lowercase() == title.trim().to_lowercase() {
        rest.trim()
    } else {
        raw
    }
}
