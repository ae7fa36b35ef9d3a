//! Integration tests for section ranking.

mod common;

use chrono::{TimeZone, Utc};
use common::MemorySource;
use docsift::batch::load_documents;
use docsift::model::{PageText, RankingRequest};
use docsift::ranking::{rank_document, rank_globally, score_section, KeywordGenerator};
use docsift::{DocumentText, Ranker, RankingOptions, SummaryStrategy};
use std::path::Path;

const REQUEST: &str = r#"{
    "challenge_info": {"challenge_id": "round_1b_003", "test_case_name": "create_manageable_forms"},
    "documents": [
        {"filename": "Learn Acrobat - Fill and Sign.pdf", "title": "Fill and Sign"},
        {"filename": "Learn Acrobat - Share.pdf", "title": "Share"},
        {"filename": "Learn Acrobat - Export.pdf", "title": "Export"}
    ],
    "persona": {"role": "HR professional"},
    "job_to_be_done": {"task": "Create and manage fillable forms for onboarding and compliance."}
}"#;

fn source() -> MemorySource {
    MemorySource::new()
        .with_text(
            "Learn Acrobat - Fill and Sign.pdf",
            &[
                "Acrobat lets you work with documents anywhere.\n\
                 Fill and Sign\n\
                 Use Fill and Sign in Acrobat to complete fillable forms quickly.\n\
                 Acrobat detects form fields automatically.",
                "Create Fillable Forms\n\
                 To create fillable forms, open Prepare a form in Acrobat.\n\n\
                 Acrobat scans the whole document and adds form fields for onboarding paperwork automatically.\n\n\
                 - add text fields to the forms\n\
                 - add signature fields for compliance review",
            ],
        )
        .with_text(
            "Learn Acrobat - Share.pdf",
            &["Share Files\nSend a link to share files with anyone.\nReview Comments\nCollect comments on forms from reviewers."],
        )
        .with_text(
            "Learn Acrobat - Export.pdf",
            &["Export to Word\nConvert a document to an editable Word file.\n"],
        )
}

fn ranked(options: RankingOptions) -> docsift::RankingResult {
    let request = RankingRequest::from_json(REQUEST).unwrap();
    let documents = load_documents(&source(), &request, Path::new("/collection"), false);
    let ts = Utc.with_ymd_and_hms(2025, 7, 10, 9, 30, 0).unwrap();
    Ranker::with_options(options).rank_at(&request, &documents, ts)
}

#[test]
fn test_hr_keyword_fixture() {
    let set = KeywordGenerator::default().primary("HR professional", "Create onboarding forms");
    let terms: Vec<&str> = set.iter().map(|(t, _)| t).collect();
    assert_eq!(terms, vec!["create", "forms", "onboarding", "professional"]);
    assert!(!set.contains("hr"));
}

#[test]
fn test_ranks_are_contiguous_and_aligned() {
    let result = ranked(RankingOptions::default());
    let n = result.extracted_sections.len();
    assert!(n > 0);
    assert_eq!(n, result.subsection_analysis.len());

    let ranks: Vec<u32> = result.extracted_sections.iter().map(|s| s.importance_rank).collect();
    assert_eq!(ranks, (1..=n as u32).collect::<Vec<_>>());

    for (section, analysis) in result
        .extracted_sections
        .iter()
        .zip(&result.subsection_analysis)
    {
        assert_eq!(section.document, analysis.document);
        assert_eq!(section.page_number, analysis.page_number);
        assert!(analysis
            .refined_text
            .starts_with(&format!("{}: ", section.section_title)));
    }
}

#[test]
fn test_best_section_first() {
    let result = ranked(RankingOptions::default());
    let top = &result.extracted_sections[0];
    assert_eq!(top.document, "Learn Acrobat - Fill and Sign.pdf");
    assert_eq!(top.section_title, "Create Fillable Forms");
    assert_eq!(top.page_number, 2);

    // documents without any keyword never show up
    assert!(result
        .extracted_sections
        .iter()
        .all(|s| s.document != "Learn Acrobat - Export.pdf"));
}

#[test]
fn test_metadata() {
    let result = ranked(RankingOptions::default());
    assert_eq!(result.metadata.persona, "HR professional");
    assert_eq!(result.metadata.input_documents.len(), 3);
    assert_eq!(result.metadata.processing_timestamp, "2025-07-10T09:30:00+00:00");
}

#[test]
fn test_top_k_and_global_cap() {
    let result = ranked(RankingOptions::default().with_top_k(1));
    let docs: Vec<&str> = result
        .extracted_sections
        .iter()
        .map(|s| s.document.as_str())
        .collect();
    let mut unique = docs.clone();
    unique.dedup();
    assert_eq!(docs.len(), unique.len());

    let capped = ranked(RankingOptions::default().with_max_sections(Some(1)));
    assert_eq!(capped.extracted_sections.len(), 1);
}

#[test]
fn test_summary_strategies() {
    let result = ranked(RankingOptions::default());
    assert_eq!(
        result.subsection_analysis[0].refined_text,
        "Create Fillable Forms: To create fillable forms, open Prepare a form in Acrobat."
    );

    let longest = ranked(RankingOptions::default().with_summary(SummaryStrategy::Longest));
    assert!(longest.subsection_analysis[0]
        .refined_text
        .starts_with("Create Fillable Forms: Acrobat scans the whole document"));
}

#[test]
fn test_scores_independent_of_section_order() {
    let generator = KeywordGenerator::default();
    let keywords = generator.primary("HR professional", "Create onboarding forms");
    let options = RankingOptions::default();

    let doc = DocumentText::new(
        "a.pdf",
        vec![PageText::new(
            1,
            "Alpha Forms\nforms for onboarding staff\nBeta Notes\nnothing relevant at all here\nGamma Create\ncreate forms",
        )],
    );
    let sections = docsift::ranking::Segmenter::default().segment(&doc.pages);
    let mut reversed = sections.clone();
    reversed.reverse();

    for s in &sections {
        let again = reversed.iter().find(|r| r.title == s.title).unwrap();
        assert_eq!(score_section(s, &keywords, &options), score_section(again, &keywords, &options));
    }

    // equal scores keep encounter order
    let options = options.with_top_k(10);
    let first = rank_document("a.pdf", sections.clone(), &keywords, &options);
    let second = rank_document("b.pdf", sections, &keywords, &options);
    let ranked = rank_globally(vec![first, second], None);
    let order: Vec<(&str, &str)> = ranked
        .iter()
        .map(|s| (s.document.as_str(), s.section.title.as_str()))
        .collect();
    assert_eq!(
        order,
        vec![
            ("a.pdf", "Gamma Create"),
            ("b.pdf", "Gamma Create"),
            ("a.pdf", "Alpha Forms"),
            ("b.pdf", "Alpha Forms"),
        ]
    );
    assert_eq!(ranked[0].score, ranked[1].score);
    assert_eq!(ranked[2].score, ranked[3].score);
}

#[test]
fn test_min_score_filters_sections() {
    let strict = ranked(RankingOptions::default().with_min_score(1000.0));
    assert!(strict.extracted_sections.is_empty());
    assert!(strict.subsection_analysis.is_empty());

    let default = ranked(RankingOptions::default());
    assert!(!default.extracted_sections.is_empty());
}

#[test]
fn test_no_keywords_gives_empty_ranking() {
    let request = RankingRequest::from_json(
        r#"{"documents": [{"filename": "Learn Acrobat - Share.pdf"}],
            "persona": {"role": "HR"}, "job_to_be_done": {"task": "do it"}}"#,
    )
    .unwrap();
    let documents = load_documents(&source(), &request, Path::new("."), true);
    let result = Ranker::new().rank(&request, &documents);
    assert!(result.extracted_sections.is_empty());
    assert!(result.subsection_analysis.is_empty());
}

#[test]
fn test_missing_document_is_skipped() {
    let request = RankingRequest::from_json(
        r#"{"documents": [{"filename": "missing.pdf"}, {"filename": "Learn Acrobat - Share.pdf"}],
            "persona": {"role": "Reviewer"}, "job_to_be_done": {"task": "Collect comments on forms"}}"#,
    )
    .unwrap();
    let documents = load_documents(&source(), &request, Path::new("."), true);
    assert!(documents[0].pages.is_empty());

    let result = Ranker::new().rank(&request, &documents);
    assert!(result
        .extracted_sections
        .iter()
        .all(|s| s.document == "Learn Acrobat - Share.pdf"));
    assert!(!result.extracted_sections.is_empty());
}

#[test]
fn test_malformed_request() {
    for json in [
        "{not json",
        r#"{"documents": [], "persona": {"role": "x"}, "job_to_be_done": {"task": "y"}}"#,
        r#"{"documents": [{"filename": " "}], "persona": {"role": "x"}, "job_to_be_done": {"task": "y"}}"#,
        r#"{"documents": [{"filename": "a.pdf"}], "job_to_be_done": {"task": "y"}}"#,
    ] {
        assert!(matches!(
            RankingRequest::from_json(json),
            Err(docsift::Error::MalformedRequest(_))
        ));
    }
}
