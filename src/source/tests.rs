use super::*;
use std::io::Write;

#[test]
fn test_decode_plain_utf8() {
    let (text, encoding) = decode("第一章 开端".as_bytes()).unwrap();
    assert_eq!(text, "第一章 开端");
    assert_eq!(encoding, SourceEncoding::Utf8);
}

#[test]
fn test_decode_strips_utf8_bom() {
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(b"Chapter 1");

    let (text, encoding) = decode(&bytes).unwrap();
    assert_eq!(text, "Chapter 1");
    assert_eq!(encoding, SourceEncoding::Utf8Bom);
}

#[test]
fn test_decode_utf16_le_and_be() {
    let mut le = vec![0xFF, 0xFE];
    let mut be = vec![0xFE, 0xFF];
    for unit in "第1章".encode_utf16() {
        le.extend_from_slice(&unit.to_le_bytes());
        be.extend_from_slice(&unit.to_be_bytes());
    }

    assert_eq!(decode(&le).unwrap(), ("第1章".to_string(), SourceEncoding::Utf16Le));
    assert_eq!(decode(&be).unwrap(), ("第1章".to_string(), SourceEncoding::Utf16Be));
}

#[test]
fn test_decode_odd_utf16_fails() {
    let result = decode(&[0xFF, 0xFE, 0x41]);
    assert!(matches!(result, Err(SourceError::OddUtf16Length(1))));
}

#[test]
fn test_decode_invalid_utf8_is_lossy() {
    let (text, encoding) = decode(&[b'a', 0xFF, b'b']).unwrap();
    assert_eq!(text, "a\u{FFFD}b");
    assert_eq!(encoding, SourceEncoding::Utf8Lossy);
}

#[test]
fn test_normalize_line_breaks() {
    assert_eq!(normalize_line_breaks("a\r\nb\rc\n".to_string()), "a\nb\nc\n");
    assert_eq!(normalize_line_breaks("unchanged\n".to_string()), "unchanged\n");
}

#[test]
fn test_load_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("novel.txt");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(b"Chapter 1\r\nalpha\r\n").unwrap();

    let source = SourceDocument::load(&path).unwrap();

    assert_eq!(source.text, "Chapter 1\nalpha\n");
    assert_eq!(source.stem.as_deref(), Some("novel"));
    assert_eq!(source.path.as_deref(), Some(path.as_path()));
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = SourceDocument::load(dir.path().join("missing.txt")).unwrap_err();

    assert!(matches!(err, SourceError::ReadFailed { .. }));
    assert!(err.to_string().contains("missing.txt"));
}

#[test]
fn test_from_text() {
    let source = SourceDocument::from_text("x\r\ny", Some("pipe".to_string()));
    assert_eq!(source.text, "x\ny");
    assert_eq!(source.stem.as_deref(), Some("pipe"));
    assert!(source.path.is_none());
}

#[test]
fn test_decode_gbk_bytes() {
    // 第一章 in GBK
    let bytes = [0xB5, 0xDA, 0xD2, 0xBB, 0xD5, 0xC2, b' ', b'A'];
    assert!(std::str::from_utf8(&bytes).is_err());

    let (text, encoding) = decode(&bytes).unwrap();
    assert_eq!(text, "第一章 A");
    assert_eq!(encoding, SourceEncoding::Gb18030);
}

#[test]
fn test_load_gb18030_novel_detects_chapters() {
    let novel = "第一章 开端\n内容A\n第二章 进展\n内容B";
    let (bytes, _, unmappable) = encoding_rs::GB18030.encode(novel);
    assert!(!unmappable);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.txt");
    std::fs::write(&path, &bytes).unwrap();

    let source = SourceDocument::load(&path).unwrap();
    assert_eq!(source.encoding, SourceEncoding::Gb18030);
    assert_eq!(source.text, novel);

    let chapters = crate::segment::detect(&source.text);
    assert_eq!(chapters.len(), 2);
    assert_eq!(chapters[0].title, "第一章 开端");
    assert_eq!(chapters[1].title, "第二章 进展");
}
