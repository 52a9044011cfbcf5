use super::*;
use proptest::prelude::*;

const TWO_CHAPTERS: &str = "第一章 开端\n内容A\n第二章 进展\n内容B";

fn assert_contiguous(document: &str, chapters: &[Chapter]) {
    for pair in chapters.windows(2) {
        assert_eq!(pair[0].end, pair[1].start);
        assert!(pair[0].start < pair[1].start);
    }
    if let Some(last) = chapters.last() {
        assert_eq!(last.end, document.len());
    }
}

#[test]
fn test_detect_cjk_chapters() {
    let chapters = detect(TWO_CHAPTERS);

    assert_eq!(chapters.len(), 2);
    assert_eq!(chapters[0].title, "第一章 开端");
    assert_eq!(chapters[1].title, "第二章 进展");
    assert_eq!(chapters[0].start, 0);
    assert_eq!(chapters[0].slice(TWO_CHAPTERS), "第一章 开端\n内容A\n");
    assert_eq!(chapters[1].slice(TWO_CHAPTERS), "第二章 进展\n内容B");
    assert_contiguous(TWO_CHAPTERS, &chapters);
}

#[test]
fn test_no_headings_yields_nothing() {
    let text = "Once upon a time.\nThere was a story.\n\nThe end.";
    assert!(detect(text).is_empty());
    assert!(detect("").is_empty());
}

#[test]
fn test_preface_is_excluded() {
    let text = "Preface text\nmore preface\nChapter 1\nbody";
    let chapters = detect(text);

    assert_eq!(chapters.len(), 1);
    assert_eq!(chapters[0].start, text.find("Chapter 1").unwrap());
    assert_eq!(chapters[0].end, text.len());
}

#[test]
fn test_detect_is_deterministic() {
    let text = "CHAPTER I\nfoo\n\nCHAPTER II\nbar\n1. list-like heading\nbaz";
    assert_eq!(detect(text), detect(text));
}

#[test]
fn test_heading_kinds() {
    let table = PatternTable::builtin();

    let cases = vec![
        ("第十二章 风起", Some(HeadingKind::Numbered)),
        ("第3回", Some(HeadingKind::Numbered)),
        ("  第 7 节  小结", Some(HeadingKind::Numbered)),
        ("第一百零一 终章", Some(HeadingKind::Numbered)),
        ("【第十章】重逢", Some(HeadingKind::Bracketed)),
        ("[第3章] Title", Some(HeadingKind::Bracketed)),
        ("【12章】", Some(HeadingKind::Bracketed)),
        ("Chapter 4", Some(HeadingKind::English)),
        ("CHAPTER IV. The Storm", Some(HeadingKind::English)),
        ("Chapter 12: Home", Some(HeadingKind::English)),
        ("1. Introduction", Some(HeadingKind::Enumerated)),
        ("12、开端", Some(HeadingKind::Enumerated)),
        ("7.", Some(HeadingKind::Enumerated)),
    ];

    for (line, expected) in cases {
        assert_eq!(table.classify(line), expected, "Failed for {:?}", line);
    }
}

#[test]
fn test_prose_lines_are_not_headings() {
    let table = PatternTable::builtin();

    let lines = vec![
        "第一次见面的时候",
        "3.14 is roughly pi",
        "chapter 3 was boring",
        "Chapter Interlude",
        "Chapters 1-3 recap",
        "[1] Smith et al.",
        "   ",
        "",
    ];

    for line in lines {
        assert_eq!(table.classify(line), None, "Unexpected match for {:?}", line);
    }
}

#[test]
fn test_first_family_wins() {
    let table = PatternTable::builtin();
    assert_eq!(table.family_count(), 4);

    // Also a plausible enumerated line, but the numbered family is tried first
    assert_eq!(table.classify("第1章 1. 起点"), Some(HeadingKind::Numbered));
}

#[test]
fn test_heading_with_leading_whitespace_keeps_line_start() {
    let text = "intro\n   Chapter 2  \nbody\n";
    let chapters = detect(text);

    assert_eq!(chapters.len(), 1);
    assert_eq!(chapters[0].title, "Chapter 2");
    assert_eq!(chapters[0].start, "intro\n".len());
}

#[test]
fn test_crlf_lines_are_matched() {
    let text = "Chapter 1\r\nalpha\r\nChapter 2\r\nbeta\r\n";
    let chapters = detect(text);

    assert_eq!(chapters.len(), 2);
    assert_eq!(chapters[0].title, "Chapter 1");
    assert_eq!(chapters[1].start, "Chapter 1\r\nalpha\r\n".len());
    assert_contiguous(text, &chapters);
}

#[test]
fn test_byte_len_sums_to_covered_range() {
    let text = "prelude\n1. one\naaa\n2. two\nbbb\n3. three\nccc";
    let chapters = detect(text);

    let covered: usize = chapters.iter().map(|c| c.byte_len()).sum();
    assert_eq!(covered, text.len() - chapters[0].start);
}

fn body_line() -> impl Strategy<Value = String> {
    "[a-z ]{0,24}"
}

proptest! {
    #[test]
    fn prop_chapters_are_contiguous(
        lines in prop::collection::vec((any::<bool>(), body_line()), 0..40)
    ) {
        let mut headings = 0;
        let document = lines
            .iter()
            .map(|(is_heading, body)| {
                if *is_heading {
                    headings += 1;
                    format!("Chapter {}", headings)
                } else {
                    body.clone()
                }
            })
            .collect::<Vec<_>>()
            .join("\n");

        let chapters = detect(&document);

        prop_assert_eq!(chapters.len(), headings);
        for pair in chapters.windows(2) {
            prop_assert_eq!(pair[0].end, pair[1].start);
        }
        if let Some(last) = chapters.last() {
            prop_assert_eq!(last.end, document.len());
        }
        prop_assert_eq!(detect(&document), chapters);
    }
}
