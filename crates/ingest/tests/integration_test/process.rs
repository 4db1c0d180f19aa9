use std::sync::Arc;

use folio_core::PipelineConfig;
use folio_ingest::entity::{EntityError, EntitySpan, PersonRecognizer};
use folio_ingest::{Pipeline, PersonExtractor};

use crate::helpers::{
    encrypted_pdf, make_pdf, make_pipeline, small_config, story_pdf, test_data_dir, write_file,
    PdfInfo,
};

struct BrokenModel;

impl PersonRecognizer for BrokenModel {
    fn recognize(&self, _text: &str) -> Result<Vec<EntitySpan>, EntityError> {
        Err(EntityError::ModelUnavailable("model weights missing".into()))
    }

    fn name(&self) -> &str {
        "broken"
    }
}

#[test]
fn test_process_story_pdf() {
    let dir = test_data_dir();
    let path = write_file(&dir, "story.pdf", &story_pdf());

    let result = make_pipeline().process(&path).unwrap();

    assert_eq!(result.metadata.file_name, "story.pdf");
    assert_eq!(result.metadata.page_count, 2);
    assert_eq!(result.metadata.title.as_deref(), Some("Test Title"));
    assert_eq!(result.metadata.author.as_deref(), Some("Test Author"));
    assert_eq!(
        result.metadata.created_date.as_deref(),
        Some("2024-01-15T10:30:00+01:00")
    );
    assert_eq!(
        result.metadata.file_size,
        std::fs::metadata(&path).unwrap().len()
    );

    assert!(result.chunks.len() > 1);
    assert_eq!(result.document_info.total_chunks, result.chunks.len());
    assert_eq!(result.document_info.total_pages, 2);
    assert_eq!(result.document_info.content_hash.len(), 64);
    for (i, chunk) in result.chunks.iter().enumerate() {
        assert_eq!(chunk.chunk_id, format!("chunk_{i}"));
        assert_eq!(chunk.chunk_metadata.chunk_position.index, i);
        assert_eq!(chunk.chunk_metadata.chunk_position.total_chunks, result.chunks.len());
        assert!(!chunk.content.trim().is_empty());
        assert_eq!(chunk.char_count, chunk.content.chars().count());
        assert!(chunk.chunk_metadata.page_number >= 1);
        assert!(chunk.chunk_metadata.page_end <= 2);
    }
    assert_eq!(result.chunks[0].chunk_metadata.page_number, 1);
    assert_eq!(result.chunks.last().unwrap().chunk_metadata.page_end, 2);
    assert!(result.chunks[0].content.starts_with("Harry Potter"));

    assert_eq!(result.processing_info.chunk_size, 120);
    assert_eq!(result.processing_info.chunk_overlap, 24);
    assert!(result.processing_info.warnings.is_empty());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_result_json_shape() {
    let pipeline = make_pipeline();
    let result = pipeline.process_bytes("story.pdf", story_pdf()).unwrap();
    let value = serde_json::to_value(&result).unwrap();

    let mut keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        ["chunks", "document_info", "metadata", "people_mentioned", "processing_info"]
    );
    let text = serde_json::to_string(&result).unwrap();
    assert!(text.starts_with("{\"metadata\":"));
    assert!(value["people_mentioned"].is_array());
    assert!(value["metadata"]["subject"].is_null());
    assert_eq!(
        value["chunks"][0]["chunk_metadata"]["processing_info"]["chunk_method"],
        "recursive_character"
    );
}

#[test]
fn test_people_detected_across_document() {
    let result = make_pipeline().process_bytes("story.pdf", story_pdf()).unwrap();

    assert!(result.people_mentioned.contains("harry potter"));
    assert!(result.people_mentioned.contains("hermione granger"));
    assert!(!result.people_mentioned.contains("hogwarts"));

    let first = &result.chunks[0].chunk_metadata.people_mentioned;
    assert!(first.contains(&"harry potter".to_string()));
}

#[test]
fn test_blank_pdf_yields_no_chunks() {
    let bytes = make_pdf(&[""], PdfInfo::default());
    let result = make_pipeline().process_bytes("blank.pdf", bytes).unwrap();

    assert_eq!(result.metadata.page_count, 1);
    assert!(result.chunks.is_empty());
    assert!(result.people_mentioned.is_empty());
    assert_eq!(result.document_info.total_chunks, 0);
    assert_eq!(result.document_info.total_word_count, 0);
    assert!(result.metadata.title.is_none());
}

#[test]
fn test_garbage_file_is_corrupt() {
    let dir = test_data_dir();
    let path = write_file(&dir, "garbage.pdf", b"definitely not a portable document");

    let err = make_pipeline().process(&path).unwrap_err();
    assert_eq!(err.reason_code(), "CORRUPT");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_encrypted_pdf_is_encrypted() {
    let dir = test_data_dir();
    let path = write_file(&dir, "locked.pdf", &encrypted_pdf());

    let err = make_pipeline().process(&path).unwrap_err();
    assert_eq!(err.reason_code(), "ENCRYPTED");

    let err = make_pipeline()
        .process_bytes("locked.pdf", encrypted_pdf())
        .unwrap_err();
    assert_eq!(err.reason_code(), "ENCRYPTED");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_empty_input_is_unreadable() {
    let dir = test_data_dir();
    let path = write_file(&dir, "empty.pdf", b"");

    let err = make_pipeline().process(&path).unwrap_err();
    assert_eq!(err.reason_code(), "DOCUMENT_UNREADABLE");

    let err = make_pipeline().process_bytes("empty.pdf", Vec::new()).unwrap_err();
    assert_eq!(err.reason_code(), "DOCUMENT_UNREADABLE");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_missing_file_is_unreadable() {
    let dir = test_data_dir();
    let err = make_pipeline().process(&dir.join("absent.pdf")).unwrap_err();
    assert_eq!(err.reason_code(), "DOCUMENT_UNREADABLE");
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_unavailable_model_still_produces_result() {
    let extractor = PersonExtractor::new(Arc::new(BrokenModel));
    let pipeline = Pipeline::new(&small_config(), extractor).unwrap();

    let result = pipeline.process_bytes("story.pdf", story_pdf()).unwrap();

    assert!(result.people_mentioned.is_empty());
    assert!(!result.chunks.is_empty());
    assert_eq!(result.processing_info.warnings.len(), 1);
    assert!(result.processing_info.warnings[0].contains("model weights missing"));
    assert!(result
        .chunks
        .iter()
        .all(|c| c.chunk_metadata.people_mentioned.is_empty()));
}

#[test]
fn test_missing_model_file_degrades() {
    let config = PipelineConfig {
        entity_model: Some("/no/such/model.json".into()),
        ..small_config()
    };
    let result = Pipeline::from_config(&config)
        .unwrap()
        .process_bytes("story.pdf", story_pdf())
        .unwrap();
    assert!(result.people_mentioned.is_empty());
    assert_eq!(result.processing_info.warnings.len(), 1);
}

#[test]
fn test_processing_is_deterministic() {
    let pipeline = make_pipeline();
    let a = pipeline.process_bytes("story.pdf", story_pdf()).unwrap();
    let b = pipeline.process_bytes("story.pdf", story_pdf()).unwrap();

    assert_eq!(a.chunks, b.chunks);
    assert_eq!(a.people_mentioned, b.people_mentioned);
    assert_eq!(a.document_info, b.document_info);
    assert_eq!(a.metadata, b.metadata);
}
