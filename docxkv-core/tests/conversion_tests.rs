//! End-to-end conversion tests — real `.docx` packages on a real filesystem.
//!
//! Fixtures are built on the fly with `zip::ZipWriter` inside a temp dir, so
//! nothing is checked in and nothing outside the temp dir is touched.
//!
//! - Single mode: default/explicit destination, failures leave no output
//! - Batch mode: tree mirroring, fail-soft per document, lock files, ordering
//! - Output contract: JSON shape of the written files

use docxkv_core::{
    CollectingReporter, ConversionError, ConversionOutcome, Converter, ConverterConfig,
    DocumentProcessor, FileStorage, ReportEvent,
};
use serde_json::{json, Value};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::ZipWriter;

// ============================================================================
// Fixture helpers
// ============================================================================

fn document_xml(paragraphs: &[&str]) -> String {
    let body: String = paragraphs
        .iter()
        .map(|text| {
            if text.is_empty() {
                "<w:p/>".to_string()
            } else {
                format!(r#"<w:p><w:r><w:t xml:space="preserve">{text}</w:t></w:r></w:p>"#)
            }
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}<w:sectPr/></w:body></w:document>"#
    )
}

fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default();
    writer.start_file("[Content_Types].xml", options).unwrap();
    writer.write_all(b"<Types/>").unwrap();
    writer.start_file("word/document.xml", options).unwrap();
    writer
        .write_all(document_xml(paragraphs).as_bytes())
        .unwrap();
    writer.finish().unwrap().into_inner()
}

fn write_file(path: &Path, bytes: &[u8]) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, bytes).unwrap();
}

fn write_docx(path: &Path, paragraphs: &[&str]) {
    write_file(path, &docx_bytes(paragraphs));
}

fn load_json(path: &Path) -> Value {
    let contents = std::fs::read_to_string(path)
        .unwrap_or_else(|_| panic!("Missing output: {}", path.display()));
    serde_json::from_str(&contents).expect("Output is not valid JSON")
}

fn converter() -> Converter<CollectingReporter> {
    let config = ConverterConfig::default();
    Converter::new_with_dependencies(
        DocumentProcessor::new(&config),
        Box::new(FileStorage::new()),
        CollectingReporter::new(),
        config,
    )
}

/// Sample tree:
///
/// ```text
/// root/
///   a.docx
///   broken.docx        (not a package)
///   notes.txt
///   UPPER.DOCX         (extension case differs, not picked up)
///   sub/
///     b.docx
///     ~$b.docx         (lock file)
///     deeper/
///       c.docx
/// ```
fn sample_tree(root: &Path) {
    write_docx(&root.join("a.docx"), &["Name: Alpha", "", "first doc"]);
    write_file(&root.join("broken.docx"), b"this is not a zip archive");
    write_file(&root.join("notes.txt"), b"Name: ignored");
    write_docx(&root.join("UPPER.DOCX"), &["Name: Upper"]);
    write_docx(&root.join("sub/b.docx"), &["Name: Beta", "Age: 30"]);
    write_file(&root.join("sub/~$b.docx"), b"\x00lock");
    write_docx(&root.join("sub/deeper/c.docx"), &["Note: call at 9:30"]);
}

// ============================================================================
// Single mode
// ============================================================================

mod single_mode {
    use super::*;

    #[test]
    fn default_destination_is_sibling_json() {
        let temp = tempfile::tempdir().unwrap();
        let source = temp.path().join("person.docx");
        write_docx(&source, &["Name: John Doe", "", "Age: 30", "likes hiking"]);

        let outcome = converter().convert_one(&source, None);
        let output = temp.path().join("person.json");
        assert_eq!(outcome.output(), Some(output.as_path()));

        let value = load_json(&output);
        assert_eq!(
            value["content"],
            json!({"Name": "John Doe", "Age": "30", "free_text": ["likes hiking"]})
        );
        assert_eq!(value["metadata"]["source_file"], "person.docx");
        assert_eq!(value["metadata"]["total_paragraphs"], 4);
        assert_eq!(value["metadata"]["content_paragraphs"], 3);
    }

    #[test]
    fn explicit_destination_is_used() {
        let temp = tempfile::tempdir().unwrap();
        let source = temp.path().join("in.docx");
        let destination = temp.path().join("elsewhere.json");
        write_docx(&source, &["k: v"]);

        let outcome = converter().convert_one(&source, Some(&destination));
        assert!(outcome.is_converted());
        assert!(destination.exists());
        assert!(!temp.path().join("in.json").exists());
    }

    #[test]
    fn invalid_document_writes_nothing() {
        let temp = tempfile::tempdir().unwrap();
        let source = temp.path().join("bad.docx");
        write_file(&source, b"PK but not really");

        let outcome = converter().convert_one(&source, None);
        assert!(matches!(
            outcome.error(),
            Some(ConversionError::InvalidFormat { .. })
        ));
        assert!(outcome.record().is_none());
        assert!(!temp.path().join("bad.json").exists());
    }

    #[test]
    fn missing_mandatory_entry_is_named() {
        let temp = tempfile::tempdir().unwrap();
        let source = temp.path().join("no_types.docx");
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/document.xml", FileOptions::default())
            .unwrap();
        writer.write_all(document_xml(&["k: v"]).as_bytes()).unwrap();
        write_file(&source, &writer.finish().unwrap().into_inner());

        let outcome = converter().convert_one(&source, None);
        let message = outcome.error().unwrap().to_string();
        assert!(message.contains("[Content_Types].xml"), "{message}");
    }

    #[test]
    fn converting_twice_differs_only_in_timestamp() {
        let temp = tempfile::tempdir().unwrap();
        let source = temp.path().join("same.docx");
        write_docx(&source, &["B: 2", "A: 1", "loose", "", "A: 3"]);

        let mut converter = converter();
        let first = converter.convert_one(&source, None).record().cloned().unwrap();
        let second = converter.convert_one(&source, None).record().cloned().unwrap();

        assert_eq!(first.content, second.content);
        let first_keys: Vec<_> = first.content.keys().collect();
        let second_keys: Vec<_> = second.content.keys().collect();
        assert_eq!(first_keys, second_keys);

        let mut normalized = second.metadata.clone();
        normalized.converted_at = first.metadata.converted_at;
        assert_eq!(first.metadata, normalized);
    }
}

// ============================================================================
// Batch mode
// ============================================================================

mod batch_mode {
    use super::*;

    #[test]
    fn mirrors_tree_and_is_fail_soft() {
        let temp = tempfile::tempdir().unwrap();
        let source_root = temp.path().join("docs");
        let destination_root = temp.path().join("json");
        sample_tree(&source_root);

        let result = converter()
            .convert_many(&source_root, Some(&destination_root))
            .unwrap();

        assert_eq!(result.len(), 5, "a, broken, b, ~$b, c");
        assert_eq!(result.succeeded(), 3);
        assert_eq!(result.failed(), 1);
        assert_eq!(result.skipped(), 1);

        assert!(destination_root.join("a.json").exists());
        assert!(destination_root.join("sub/b.json").exists());
        assert!(destination_root.join("sub/deeper/c.json").exists());
        assert!(!destination_root.join("broken.json").exists());
        assert!(!destination_root.join("UPPER.json").exists());
        assert!(!destination_root.join("notes.json").exists());

        let c = load_json(&destination_root.join("sub/deeper/c.json"));
        assert_eq!(c["content"]["Note"], "call at 9:30");
        assert_eq!(c["metadata"]["source_file"], "c.docx");
    }

    #[test]
    fn lock_file_is_neither_success_nor_failure() {
        let temp = tempfile::tempdir().unwrap();
        sample_tree(temp.path());

        let result = converter().convert_many(temp.path(), None).unwrap();

        let lock = temp.path().join("sub/~$b.docx");
        assert!(result
            .converted_paths()
            .iter()
            .all(|p| !p.ends_with("~$b.json")));
        assert!(result.failures().all(|(source, _)| source != lock.as_path()));
        let skipped: Vec<&Path> = result
            .outcomes
            .iter()
            .filter(|o| o.is_skipped())
            .map(ConversionOutcome::source)
            .collect();
        assert_eq!(skipped, vec![lock.as_path()]);
    }

    #[test]
    fn failures_name_every_bad_source() {
        let temp = tempfile::tempdir().unwrap();
        sample_tree(temp.path());
        write_file(&temp.path().join("sub/also_bad.docx"), b"");

        let result = converter().convert_many(temp.path(), None).unwrap();
        let failed: Vec<PathBuf> = result.failures().map(|(p, _)| p.to_path_buf()).collect();
        assert_eq!(
            failed,
            vec![
                temp.path().join("broken.docx"),
                temp.path().join("sub/also_bad.docx"),
            ]
        );
    }

    #[test]
    fn default_destination_is_source_root() {
        let temp = tempfile::tempdir().unwrap();
        sample_tree(temp.path());

        converter().convert_many(temp.path(), None).unwrap();

        assert!(temp.path().join("a.json").exists());
        assert!(temp.path().join("sub/b.json").exists());
        assert!(temp.path().join("sub/deeper/c.json").exists());
    }

    #[test]
    fn enumeration_is_order_stable() {
        let temp = tempfile::tempdir().unwrap();
        let out_one = temp.path().join("out1");
        let out_two = temp.path().join("out2");
        let docs = temp.path().join("docs");
        sample_tree(&docs);

        let first = converter().convert_many(&docs, Some(&out_one)).unwrap();
        let second = converter().convert_many(&docs, Some(&out_two)).unwrap();

        let sources = |r: &docxkv_core::BatchResult| -> Vec<PathBuf> {
            r.outcomes.iter().map(|o| o.source().to_path_buf()).collect()
        };
        assert_eq!(sources(&first), sources(&second));

        let mut unique = sources(&first);
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), first.len(), "each document visited once");
    }

    #[test]
    fn empty_document_still_written() {
        let temp = tempfile::tempdir().unwrap();
        write_docx(&temp.path().join("blank.docx"), &["", "   "]);

        let mut converter = converter();
        let result = converter.convert_many(temp.path(), None).unwrap();
        assert_eq!(result.succeeded(), 1);

        let value = load_json(&temp.path().join("blank.json"));
        assert_eq!(value["content"], json!({}));
        assert_eq!(value["metadata"]["total_paragraphs"], 2);

        assert!(converter
            .reporter()
            .events
            .iter()
            .any(|e| matches!(e, ReportEvent::Warning { .. })));
    }

    #[test]
    fn summary_reported_once_at_end() {
        let temp = tempfile::tempdir().unwrap();
        sample_tree(temp.path());

        let mut converter = converter();
        converter.convert_many(temp.path(), None).unwrap();

        let events = &converter.reporter().events;
        assert_eq!(
            events.last(),
            Some(&ReportEvent::BatchFinished {
                succeeded: 3,
                failed: 1,
                skipped: 1
            })
        );
        let summaries = events
            .iter()
            .filter(|e| matches!(e, ReportEvent::BatchFinished { .. }))
            .count();
        assert_eq!(summaries, 1);
    }

    #[test]
    fn unusable_destination_aborts() {
        let temp = tempfile::tempdir().unwrap();
        sample_tree(&temp.path().join("docs"));
        let blocker = temp.path().join("not_a_dir");
        write_file(&blocker, b"occupied");

        let err = converter()
            .convert_many(&temp.path().join("docs"), Some(&blocker))
            .unwrap_err();
        assert!(matches!(err, ConversionError::OutputDirectory { .. }), "{err}");
    }

    #[test]
    fn blocked_subdirectory_aborts_mid_batch() {
        let temp = tempfile::tempdir().unwrap();
        let docs = temp.path().join("docs");
        let out = temp.path().join("out");
        write_docx(&docs.join("a.docx"), &["k: 1"]);
        write_docx(&docs.join("sub/b.docx"), &["k: 2"]);
        write_docx(&docs.join("zz.docx"), &["k: 3"]);
        write_file(&out.join("sub"), b"occupied");

        let mut converter = converter();
        let err = converter.convert_many(&docs, Some(&out)).unwrap_err();
        match err {
            ConversionError::OutputDirectory { path, .. } => assert_eq!(path, out.join("sub")),
            other => panic!("expected OutputDirectory, got {other}"),
        }

        // Work before the blocked directory stays, nothing after it runs
        assert!(out.join("a.json").exists());
        assert!(!out.join("zz.json").exists());
        assert!(!converter
            .reporter()
            .events
            .iter()
            .any(|e| matches!(e, ReportEvent::BatchFinished { .. })));
    }

    #[test]
    fn missing_source_root_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let err = converter()
            .convert_many(&temp.path().join("nope"), Some(temp.path()))
            .unwrap_err();
        assert!(matches!(err, ConversionError::Io { .. }), "{err}");
    }
}

// ============================================================================
// Output contract
// ============================================================================

mod output_contract {
    use super::*;

    #[test]
    fn metadata_precedes_content_with_two_space_indent() {
        let temp = tempfile::tempdir().unwrap();
        let source = temp.path().join("x.docx");
        write_docx(&source, &["Città: Zürich"]);

        converter().convert_one(&source, None);
        let text = std::fs::read_to_string(temp.path().join("x.json")).unwrap();

        assert!(text.starts_with("{\n  \"metadata\": {\n    \"source_file\": \"x.docx\""));
        assert!(text.find("\"metadata\"").unwrap() < text.find("\"content\"").unwrap());
        // Non-ASCII is written verbatim
        assert!(text.contains("\"Città\": \"Zürich\""), "{text}");
    }

    #[test]
    fn converted_at_is_iso_8601() {
        let temp = tempfile::tempdir().unwrap();
        let source = temp.path().join("x.docx");
        write_docx(&source, &["k: v"]);

        converter().convert_one(&source, None);
        let value = load_json(&temp.path().join("x.json"));
        let stamp = value["metadata"]["converted_at"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok(), "{stamp}");
    }

    #[test]
    fn free_text_absent_when_every_line_is_a_pair() {
        let temp = tempfile::tempdir().unwrap();
        let source = temp.path().join("x.docx");
        write_docx(&source, &["a: 1", "b: 2"]);

        converter().convert_one(&source, None);
        let value = load_json(&temp.path().join("x.json"));
        assert!(value["content"].get("free_text").is_none());
    }
}
