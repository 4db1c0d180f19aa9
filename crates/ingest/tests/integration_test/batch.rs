use std::sync::Arc;

use folio_ingest::entity::{EntityError, EntitySpan, PersonRecognizer};
use folio_ingest::pipeline::read_json;
use folio_ingest::{BatchRunner, LazyRecognizer, PersonExtractor, Pipeline};

use crate::helpers::{
    encrypted_pdf, make_pdf, make_pipeline, small_config, story_pdf, test_data_dir, write_file,
    PdfInfo,
};

/// Delegates to the bundled model but panics on one trigger word.
struct TrippingModel {
    inner: LazyRecognizer,
}

impl PersonRecognizer for TrippingModel {
    fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>, EntityError> {
        if text.contains("Detonate") {
            panic!("recognizer tripped");
        }
        self.inner.recognize(text)
    }

    fn name(&self) -> &str {
        "tripping"
    }
}

#[test]
fn test_batch_isolates_failures() {
    let dir = test_data_dir();
    let paths = vec![
        write_file(&dir, "first.pdf", &story_pdf()),
        write_file(&dir, "broken.pdf", b"%not really a pdf%"),
        write_file(
            &dir,
            "third.pdf",
            &make_pdf(&["Ada Lovelace wrote notes on the engine."], PdfInfo::default()),
        ),
    ];

    let runner = BatchRunner::new(make_pipeline(), 3).unwrap();
    let report = runner.run(&paths);

    assert_eq!(report.outcomes.len(), 3);
    assert!(report.outcomes[0].is_success());
    assert!(!report.outcomes[1].is_success());
    assert!(report.outcomes[2].is_success());
    assert_eq!(report.outcomes[1].path, paths[1]);

    let summary = report.summary();
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.failures[0].file_name, "broken.pdf");
    assert_eq!(summary.failures[0].reason, "CORRUPT");

    let names: Vec<_> = report.successes().map(|r| r.metadata.file_name.as_str()).collect();
    assert_eq!(names, ["first.pdf", "third.pdf"]);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_batch_matches_single_runs() {
    let dir = test_data_dir();
    let paths: Vec<_> = (0..4)
        .map(|i| write_file(&dir, &format!("doc{i}.pdf"), &story_pdf()))
        .collect();

    let pipeline = make_pipeline();
    let single = pipeline.process(&paths[0]).unwrap();
    let report = BatchRunner::new(pipeline, 2).unwrap().run(&paths);

    assert_eq!(report.succeeded(), 4);
    for result in report.successes() {
        assert_eq!(result.chunks, single.chunks);
        assert_eq!(result.people_mentioned, single.people_mentioned);
    }

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_batch_writes_results_to_directory() {
    let dir = test_data_dir();
    let out = dir.join("out");
    let paths = vec![
        write_file(&dir, "story.pdf", &story_pdf()),
        write_file(&dir, "missing-later.pdf", &story_pdf()),
    ];
    std::fs::remove_file(&paths[1]).unwrap();

    let report = BatchRunner::new(make_pipeline(), 2)
        .unwrap()
        .run_to_dir(&paths, &out, true);

    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.failed(), 1);
    let written = read_json(&out.join("story.json")).unwrap();
    let in_memory = report.successes().next().unwrap();
    assert_eq!(written.chunks, in_memory.chunks);
    assert_eq!(written.people_mentioned, in_memory.people_mentioned);
    assert!(!out.join("missing-later.json").exists());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_batch_survives_panicking_document() {
    let dir = test_data_dir();
    let paths = vec![
        write_file(&dir, "first.pdf", &story_pdf()),
        write_file(
            &dir,
            "tripwire.pdf",
            &make_pdf(&["Detonate the parser right now."], PdfInfo::default()),
        ),
        write_file(&dir, "third.pdf", &story_pdf()),
    ];

    let model = TrippingModel {
        inner: LazyRecognizer::bundled(),
    };
    let pipeline = Pipeline::new(&small_config(), PersonExtractor::new(Arc::new(model))).unwrap();
    let report = BatchRunner::new(pipeline, 2).unwrap().run(&paths);

    assert_eq!(report.outcomes.len(), 3);
    assert!(report.outcomes[0].is_success());
    assert!(!report.outcomes[1].is_success());
    assert!(report.outcomes[2].is_success());

    let failure = report.failures().next().unwrap();
    assert_eq!(failure.file_name, "tripwire.pdf");
    assert_eq!(failure.reason, "CORRUPT");
    assert!(failure.message.contains("recognizer tripped"));

    for result in report.successes() {
        assert!(result.people_mentioned.contains("harry potter"));
    }

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_batch_records_encrypted_document() {
    let dir = test_data_dir();
    let paths = vec![
        write_file(&dir, "open.pdf", &story_pdf()),
        write_file(&dir, "locked.pdf", &encrypted_pdf()),
        write_file(&dir, "also-open.pdf", &story_pdf()),
    ];

    let report = BatchRunner::new(make_pipeline(), 2).unwrap().run(&paths);

    let summary = report.summary();
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.failures[0].file_name, "locked.pdf");
    assert_eq!(summary.failures[0].reason, "ENCRYPTED");
    assert!(!report.outcomes[1].is_success());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_batch_keeps_documents_sharing_a_stem() {
    let dir = test_data_dir();
    let out = dir.join("out");
    std::fs::create_dir_all(dir.join("a")).unwrap();
    std::fs::create_dir_all(dir.join("b")).unwrap();
    let paths = vec![
        write_file(&dir.join("a"), "report.pdf", &story_pdf()),
        write_file(
            &dir.join("b"),
            "report.pdf",
            &make_pdf(&["Rubeus Hagrid fed the owls."], PdfInfo::default()),
        ),
    ];

    let report = BatchRunner::new(make_pipeline(), 2)
        .unwrap()
        .run_to_dir(&paths, &out, false);
    assert_eq!(report.succeeded(), 2);

    let first = read_json(&out.join("report.json")).unwrap();
    let second = read_json(&out.join("report-1.json")).unwrap();
    assert!(first.people_mentioned.contains("harry potter"));
    assert!(second.people_mentioned.contains("rubeus hagrid"));
    assert_ne!(first.document_info.content_hash, second.document_info.content_hash);

    std::fs::remove_dir_all(&dir).ok();
}
