//! File-system attributes plus the PDF Info dictionary.
//!
//! Only an unreadable or empty file is an error here. A document the parser
//! cannot open still gets metadata (page count 0, no Info fields); the text
//! extractor is the stage that reports it as corrupt or encrypted.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use lopdf::{Dictionary, Document};
use sha2::{Digest, Sha256};

use folio_core::{DocumentMetadata, PipelineError};

/// A document read into memory once, shared by every extractor.
#[derive(Debug)]
pub struct SourceFile {
    pub path: PathBuf,
    pub file_name: String,
    pub bytes: Vec<u8>,
    created: Option<SystemTime>,
    modified: Option<SystemTime>,
}

impl SourceFile {
    /// Read a document from disk. Missing, unreadable and zero-length files
    /// are `DocumentUnreadable`.
    pub fn read(path: &Path) -> Result<Self, PipelineError> {
        let unreadable = |message: String| PipelineError::DocumentUnreadable {
            path: path.display().to_string(),
            message,
        };

        let fs_meta = fs::metadata(path).map_err(|e| unreadable(e.to_string()))?;
        if !fs_meta.is_file() {
            return Err(unreadable("not a regular file".to_string()));
        }
        let bytes = fs::read(path).map_err(|e| unreadable(e.to_string()))?;
        if bytes.is_empty() {
            return Err(unreadable("file is empty".to_string()));
        }

        Ok(Self {
            path: path.to_path_buf(),
            file_name: file_name_of(path),
            bytes,
            created: fs_meta.created().ok(),
            modified: fs_meta.modified().ok(),
        })
    }

    /// Wrap in-memory bytes that have no file-system timestamps.
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        Self {
            path: PathBuf::from(&file_name),
            file_name,
            bytes,
            created: None,
            modified: None,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Lowercase hex SHA-256 of the content.
    pub fn content_hash(&self) -> String {
        let digest = Sha256::digest(&self.bytes);
        format!("{digest:x}")
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ── Extraction ──────────────────────────────────────────────────────

/// Build `DocumentMetadata` for a loaded source file. Never fails.
pub fn extract_metadata(source: &SourceFile) -> DocumentMetadata {
    let mut metadata = DocumentMetadata {
        file_name: source.file_name.clone(),
        file_size: source.size(),
        page_count: 0,
        created_date: None,
        modified_date: None,
        title: None,
        author: None,
        subject: None,
        producer: None,
    };

    match Document::load_mem(&source.bytes) {
        Ok(doc) => {
            metadata.page_count = doc.get_pages().len();
            if let Some(info) = info_dictionary(&doc) {
                metadata.title = info_string(info, b"Title");
                metadata.author = info_string(info, b"Author");
                metadata.subject = info_string(info, b"Subject");
                metadata.producer = info_string(info, b"Producer");
                metadata.created_date = info_string(info, b"CreationDate").and_then(|d| parse_pdf_date(&d));
                metadata.modified_date = info_string(info, b"ModDate").and_then(|d| parse_pdf_date(&d));
            }
        }
        Err(e) => {
            tracing::debug!(file = %source.file_name, error = %e, "metadata parse failed");
        }
    }

    if metadata.created_date.is_none() {
        metadata.created_date = source.created.map(system_time_iso);
    }
    if metadata.modified_date.is_none() {
        metadata.modified_date = source.modified.map(system_time_iso);
    }

    metadata
}

fn info_dictionary(doc: &Document) -> Option<&Dictionary> {
    let info = doc.trailer.get(b"Info").ok()?;
    match info.as_reference() {
        Ok(id) => doc.get_object(id).ok()?.as_dict().ok(),
        Err(_) => info.as_dict().ok(),
    }
}

fn info_string(dict: &Dictionary, key: &[u8]) -> Option<String> {
    let raw = dict.get(key).ok()?.as_str().ok()?;
    let text = decode_pdf_string(raw);
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Decode a PDF text string: UTF-16BE when it carries a byte-order mark,
/// otherwise UTF-8, falling back to Latin-1 for legacy encodings.
pub fn decode_pdf_string(raw: &[u8]) -> String {
    if let Some(body) = raw.strip_prefix(&[0xFE, 0xFF]) {
        let units = body
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
        return char::decode_utf16(units)
            .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect();
    }
    match std::str::from_utf8(raw) {
        Ok(s) => s.to_string(),
        Err(_) => raw.iter().map(|&b| b as char).collect(),
    }
}

// ── Dates ───────────────────────────────────────────────────────────

/// Convert a PDF date (`D:YYYYMMDDHHmmSSOHH'mm'`, everything after the year
/// optional) to ISO-8601. Dates without a zone are rendered without one.
pub fn parse_pdf_date(raw: &str) -> Option<String> {
    let s = raw.trim();
    let s = s.strip_prefix("D:").unwrap_or(s);
    let digits_end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let (digits, zone) = s.split_at(digits_end);
    if digits.len() < 4 {
        return None;
    }

    let field = |from: usize, default: u32| -> Option<u32> {
        match digits.get(from..from + 2) {
            Some(d) => d.parse().ok(),
            None => Some(default),
        }
    };
    let year: i32 = digits[..4].parse().ok()?;
    let naive: NaiveDateTime = NaiveDate::from_ymd_opt(year, field(4, 1)?, field(6, 1)?)?
        .and_hms_opt(field(8, 0)?, field(10, 0)?, field(12, 0)?)?;

    match parse_zone(zone) {
        Some(offset) => Some(offset.from_local_datetime(&naive).single()?.to_rfc3339()),
        None => Some(naive.format("%Y-%m-%dT%H:%M:%S").to_string()),
    }
}

fn parse_zone(zone: &str) -> Option<FixedOffset> {
    let sign = match zone.chars().next()? {
        'Z' => return FixedOffset::east_opt(0),
        '+' => 1,
        '-' => -1,
        _ => return None,
    };
    let digits: String = zone[1..].chars().filter(|c| c.is_ascii_digit()).collect();
    let hours: i32 = digits.get(..2)?.parse().ok()?;
    let minutes: i32 = digits.get(2..4).and_then(|m| m.parse().ok()).unwrap_or(0);
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

fn system_time_iso(t: SystemTime) -> String {
    DateTime::<Utc>::from(t).to_rfc3339()
}
