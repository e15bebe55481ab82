use std::fs;

use newsletter_core::RenderedMessage;
use newsletter_engine::{decode_html, ensure_output_dir, write_preview, AtomicFileWriter};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[test]
fn bom_wins_over_declared_charset() {
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice("<p>naïve</p>".as_bytes());

    let decoded = decode_html(&bytes, Some("text/html; charset=iso-8859-1")).unwrap();

    assert_eq!(decoded.html, "<p>naïve</p>");
    assert_eq!(decoded.encoding_label, "UTF-8");
}

#[test]
fn meta_charset_is_used_without_header() {
    let bytes = b"<html><head><meta charset=\"windows-1252\"></head><body>Caf\xe9</body></html>";

    let decoded = decode_html(bytes, None).unwrap();

    assert!(decoded.html.contains("Café"));
    assert_eq!(decoded.encoding_label, "windows-1252");
}

#[test]
fn plain_utf8_is_detected() {
    let decoded = decode_html("<h1>Grüße</h1>".as_bytes(), None).unwrap();
    assert_eq!(decoded.html, "<h1>Grüße</h1>");
}

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("out");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("history.ron", "hello").unwrap();
    assert_eq!(fs::read_to_string(&first).unwrap(), "hello");

    let second = writer.write("history.ron", "world").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "world");
}

#[test]
fn writer_refuses_a_file_as_directory() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    assert!(writer.write("doc.html", "data").is_err());
    assert!(!file_path.with_file_name("doc.html").exists());
}

#[test]
fn preview_writes_both_formats_with_shared_stem() {
    let temp = TempDir::new().unwrap();
    let message = RenderedMessage {
        html: "<p>Hello</p>".into(),
        text: "Hello".into(),
    };

    let paths = write_preview(temp.path(), "October Dispatch", &message).unwrap();

    assert_eq!(fs::read_to_string(&paths.html).unwrap(), "<p>Hello</p>");
    assert_eq!(fs::read_to_string(&paths.text).unwrap(), "Hello");
    assert_eq!(paths.html.file_stem(), paths.text.file_stem());
    let stem = paths.html.file_stem().unwrap().to_string_lossy().into_owned();
    assert!(stem.starts_with("october-dispatch--"));
}
