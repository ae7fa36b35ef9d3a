//! Integration tests for directory and request-file processing.

mod common;

use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};

use common::{page, project_plan_pdf, span_block, write_file, MemorySource};
use docsift::batch::{self, BatchItem};
use docsift::model::LayoutDocument;
use docsift::{JsonFormat, OutlineExtractor, PdfLayoutSource, Ranker};
use serde_json::Value;

fn guide() -> LayoutDocument {
    LayoutDocument::new("guide.pdf")
        .with_page(page(
            1,
            vec![
                span_block(150.0, "User Guide", 24.0, true),
                span_block(250.0, "This guide explains how to install and run the tool.", 11.0, false),
            ],
        ))
        .with_page(page(
            2,
            vec![
                span_block(150.0, "1. Installation", 16.0, true),
                span_block(250.0, "Download the archive and unpack it somewhere sensible.", 11.0, false),
            ],
        ))
}

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_outline_directory_with_failures() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_file(input.path(), "guide.pdf", b"%PDF-1.7\n");
    write_file(input.path(), "broken.pdf", b"%PDF-1.7\n");
    write_file(input.path(), "notes.txt", b"ignored");

    let source = MemorySource::new().with_layout(guide());
    let seen = AtomicUsize::new(0);
    let items = batch::outline_directory(
        input.path(),
        output.path(),
        &OutlineExtractor::new(),
        &source,
        true,
        JsonFormat::Pretty,
        |_: &BatchItem| {
            seen.fetch_add(1, Ordering::SeqCst);
        },
    )
    .unwrap();

    assert_eq!(seen.load(Ordering::SeqCst), 2);
    let names: Vec<String> = items
        .iter()
        .map(|i| i.output.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["broken.json", "guide.json"]);
    assert!(!output.path().join("notes.json").exists());

    let broken = read_json(&output.path().join("broken.json"));
    assert_eq!(broken["title"], "broken.pdf");
    assert_eq!(broken["outline"], Value::Array(vec![]));

    let guide = read_json(&output.path().join("guide.json"));
    assert_eq!(guide["title"], "User Guide");
    assert_eq!(guide["outline"][0]["level"], "H1");
    assert_eq!(guide["outline"][0]["text"], "1. Installation");
    assert_eq!(guide["outline"][0]["page"], 2);
    assert_eq!(items[1].headings, 1);
}

#[test]
fn test_outline_directory_real_pdfs() {
    let input = tempfile::tempdir().unwrap();
    let output = input.path().join("out");
    write_file(input.path(), "plan.pdf", &project_plan_pdf());
    write_file(input.path(), "corrupt.pdf", b"%PDF-1.4\ngarbage");
    write_file(input.path(), "fake.pdf", b"not a pdf at all");

    let items = batch::outline_directory(
        input.path(),
        &output,
        &OutlineExtractor::new(),
        &PdfLayoutSource::new(),
        false,
        JsonFormat::Compact,
        |_: &BatchItem| {},
    )
    .unwrap();
    assert_eq!(items.len(), 3);

    for name in ["corrupt", "fake"] {
        let value = read_json(&output.join(format!("{}.json", name)));
        assert_eq!(value["title"], format!("{}.pdf", name));
        assert!(value["outline"].as_array().unwrap().is_empty());
    }

    let plan = read_json(&output.join("plan.json"));
    assert_eq!(plan["title"], "Project Plan");
    let compact = fs::read_to_string(output.join("plan.json")).unwrap();
    assert!(!compact.trim_end().contains('\n'));
}

#[test]
fn test_outline_directory_run_level_errors() {
    let missing = tempfile::tempdir().unwrap().path().join("missing");
    let out = tempfile::tempdir().unwrap();
    assert!(batch::outline_directory(
        &missing,
        out.path(),
        &OutlineExtractor::new(),
        &MemorySource::new(),
        false,
        JsonFormat::Pretty,
        |_: &BatchItem| {},
    )
    .is_err());

    // output location is an existing file
    let input = tempfile::tempdir().unwrap();
    write_file(input.path(), "a.pdf", b"%PDF-1.7\n");
    let blocker = write_file(out.path(), "blocker", b"");
    assert!(batch::outline_directory(
        input.path(),
        &blocker,
        &OutlineExtractor::new(),
        &MemorySource::new(),
        false,
        JsonFormat::Pretty,
        |_: &BatchItem| {},
    )
    .is_err());
}

#[test]
fn test_empty_input_directory() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let items = batch::outline_directory(
        input.path(),
        output.path(),
        &OutlineExtractor::new(),
        &MemorySource::new(),
        true,
        JsonFormat::Pretty,
        |_: &BatchItem| {},
    )
    .unwrap();
    assert!(items.is_empty());
}

const REQUEST: &str = r#"{
    "documents": [{"filename": "trip.pdf"}, {"filename": "food.pdf"}],
    "persona": {"role": "Travel planner"},
    "job_to_be_done": {"task": "Plan a four day trip with beaches and nightlife"}
}"#;

fn travel_source() -> MemorySource {
    MemorySource::new()
        .with_text(
            "trip.pdf",
            &[
                "Coastal Adventures\nThe beaches here are wide and the nightlife runs late.\n\
                 Beaches near the old port are the busiest in summer.",
                "History of the Region\nThe region was settled long ago by farmers and traders.",
            ],
        )
        .with_text(
            "food.pdf",
            &["Local Cuisine\nFresh seafood is served at every harbour restaurant."],
        )
}

#[test]
fn test_rank_request_resolves_docs_dir() {
    let dir = tempfile::tempdir().unwrap();
    let request = write_file(dir.path(), "request.json", REQUEST.as_bytes());
    let ranker = Ranker::new();
    let source = travel_source();

    for docs_dir in [None, Some(std::path::Path::new("/elsewhere"))] {
        let result = batch::rank_request(&request, docs_dir, &ranker, &source, true).unwrap();
        assert_eq!(result.metadata.persona, "Travel planner");
        assert_eq!(result.metadata.input_documents, vec!["trip.pdf", "food.pdf"]);
        assert_eq!(result.extracted_sections[0].section_title, "Coastal Adventures");
        assert_eq!(result.extracted_sections[0].importance_rank, 1);
        assert!(result
            .extracted_sections
            .iter()
            .all(|s| s.document == "trip.pdf"));
    }
}

#[test]
fn test_rank_request_malformed() {
    let dir = tempfile::tempdir().unwrap();
    let request = write_file(dir.path(), "request.json", br#"{"persona": {"role": "x"}}"#);
    let err = batch::rank_request(&request, None, &Ranker::new(), &travel_source(), false)
        .unwrap_err();
    assert!(matches!(err, docsift::Error::MalformedRequest(_)));
}
