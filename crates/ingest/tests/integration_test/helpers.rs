use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use uuid::Uuid;

use folio_core::PipelineConfig;
use folio_ingest::Pipeline;

/// Create a unique temp directory for each test.
pub fn test_data_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("folio-test-{}", Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Small chunks so short fixtures still produce several of them.
pub fn small_config() -> PipelineConfig {
    PipelineConfig {
        chunk_size: 120,
        chunk_overlap: 24,
        min_chunk_size: 12,
        concurrency: 2,
        ..PipelineConfig::default()
    }
}

pub fn make_pipeline() -> Pipeline {
    Pipeline::from_config(&small_config()).unwrap()
}

/// Info dictionary entries for a fixture PDF.
#[derive(Default)]
pub struct PdfInfo<'a> {
    pub title: Option<&'a str>,
    pub author: Option<&'a str>,
    pub creation_date: Option<&'a str>,
}

/// Build a PDF with one page per entry. Each line of a page becomes its own
/// text object; an empty string gives a page with no text at all.
pub fn make_pdf(pages: &[&str], info: PdfInfo<'_>) -> Vec<u8> {
    save(build_pdf(pages, info))
}

/// A readable page tree behind a standard security handler entry. No
/// password is supplied, so extraction must refuse it.
pub fn encrypted_pdf() -> Vec<u8> {
    let mut doc = build_pdf(&[STORY_PAGE_ONE], PdfInfo::default());
    let encrypt_id = doc.add_object(dictionary! {
        "Filter" => "Standard",
        "V" => 1,
        "R" => 2,
        "O" => Object::string_literal(vec![0x4Fu8; 32]),
        "U" => Object::string_literal(vec![0x55u8; 32]),
        "P" => -44,
    });
    doc.trailer.set("Encrypt", encrypt_id);
    doc.trailer.set(
        "ID",
        vec![
            Object::string_literal(vec![0x01u8; 16]),
            Object::string_literal(vec![0x01u8; 16]),
        ],
    );
    save(doc)
}

fn save(mut doc: Document) -> Vec<u8> {
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

fn build_pdf(pages: &[&str], info: PdfInfo<'_>) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for page_text in pages {
        let mut operations = Vec::new();
        for (i, line) in page_text.lines().enumerate() {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
            operations.push(Operation::new(
                "Td",
                vec![72.into(), (720 - 16 * i as i64).into()],
            ));
            operations.push(Operation::new("Tj", vec![Object::string_literal(line)]));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Count" => kids.len() as i64,
        "Kids" => kids,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let has_info = info.title.is_some() || info.author.is_some() || info.creation_date.is_some();
    let mut info_dict = lopdf::Dictionary::new();
    if let Some(title) = info.title {
        info_dict.set("Title", Object::string_literal(title));
    }
    if let Some(author) = info.author {
        info_dict.set("Author", Object::string_literal(author));
    }
    if let Some(date) = info.creation_date {
        info_dict.set("CreationDate", Object::string_literal(date));
    }
    if has_info {
        let info_id = doc.add_object(info_dict);
        doc.trailer.set("Info", info_id);
    }
    doc
}

/// Write fixture bytes into `dir` and return the full path.
pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

pub const STORY_PAGE_ONE: &str = "Harry Potter visited Hogwarts with Hermione Granger.
The castle was quiet in the early morning and the lake was still.
They walked past the greenhouses before breakfast.";

pub const STORY_PAGE_TWO: &str = "Later that day the rain began to fall over the hills.
Nobody expected the storm to last until the evening.
The library stayed open late for anyone who wanted to read.";

/// Two pages of plain prose with a full Info dictionary.
pub fn story_pdf() -> Vec<u8> {
    make_pdf(
        &[STORY_PAGE_ONE, STORY_PAGE_TWO],
        PdfInfo {
            title: Some("Test Title"),
            author: Some("Test Author"),
            creation_date: Some("D:20240115103000+01'00'"),
        },
    )
}
