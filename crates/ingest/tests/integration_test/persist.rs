use folio_ingest::pipeline::{read_json, write_json};

use crate::helpers::{make_pipeline, story_pdf, test_data_dir};

#[test]
fn test_persisted_result_round_trips() {
    let dir = test_data_dir();
    let result = make_pipeline().process_bytes("story.pdf", story_pdf()).unwrap();
    let path = dir.join("results").join("story.json");

    write_json(&result, &path).unwrap();
    let loaded = read_json(&path).unwrap();

    assert_eq!(loaded.metadata, result.metadata);
    assert_eq!(loaded.chunks, result.chunks);
    assert_eq!(loaded.people_mentioned, result.people_mentioned);
    assert_eq!(loaded.processing_info, result.processing_info);
    assert_eq!(
        loaded.document_info.content_hash,
        result.document_info.content_hash
    );
    let leftovers: Vec<_> = std::fs::read_dir(path.parent().unwrap())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_persist_into_file_path_fails_cleanly() {
    let dir = test_data_dir();
    let blocker = dir.join("occupied");
    std::fs::write(&blocker, b"x").unwrap();
    let result = make_pipeline().process_bytes("story.pdf", story_pdf()).unwrap();

    let err = write_json(&result, &blocker.join("story.json")).unwrap_err();
    assert_eq!(err.reason_code(), "PERSIST");
    assert_eq!(std::fs::read(&blocker).unwrap(), b"x");

    std::fs::remove_dir_all(&dir).ok();
}
