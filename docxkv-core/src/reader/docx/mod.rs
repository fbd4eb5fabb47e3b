//! DOCX (Microsoft Word) reader
//!
//! DOCX files are ZIP archives. Two entries mark a package as a Word document:
//! - `[Content_Types].xml`: part registry every OPC package carries
//! - `word/document.xml`: main body (paragraphs, tables, etc.)
//!
//! Only body paragraphs of `word/document.xml` are read. Styles, numbering,
//! headers, footers and table cells are ignored.

pub mod paragraphs;

pub use paragraphs::ParagraphStream;

use crate::error::ConversionError;
use crate::reader::traits::{DocumentReader, Paragraphs};
use std::io::{Cursor, Read};
use zip::result::ZipError;
use zip::ZipArchive;

pub const DOCUMENT_XML: &str = "word/document.xml";
pub const CONTENT_TYPES_XML: &str = "[Content_Types].xml";

/// Upper bound on the decompressed body part
pub const MAX_DOCUMENT_XML_BYTES: u64 = 256 * 1024 * 1024;

/// Entries checked before any XML is parsed, in reporting order
pub const REQUIRED_ENTRIES: [&str; 2] = [DOCUMENT_XML, CONTENT_TYPES_XML];

#[derive(Debug, Clone, Copy, Default)]
pub struct DocxReader;

impl DocxReader {
    pub fn new() -> Self {
        Self
    }

    /// Each call wraps the buffer in a fresh cursor, so validation never
    /// leaves a half-read stream behind for extraction.
    fn open_archive(bytes: &[u8]) -> Result<ZipArchive<Cursor<&[u8]>>, ConversionError> {
        ZipArchive::new(Cursor::new(bytes)).map_err(|e| ConversionError::InvalidFormat {
            reason: format!("file is not a valid ZIP/DOCX package ({e})"),
        })
    }

    /// Decompress `word/document.xml`
    pub fn read_document_xml(bytes: &[u8]) -> Result<Vec<u8>, ConversionError> {
        let mut archive = Self::open_archive(bytes)?;
        let mut entry = archive.by_name(DOCUMENT_XML).map_err(|e| match e {
            ZipError::FileNotFound => ConversionError::missing_entry(DOCUMENT_XML),
            other => ConversionError::ParseFailure {
                reason: format!("cannot open {DOCUMENT_XML}: {other}"),
            },
        })?;

        // The declared size comes from the central directory and is not trusted
        if entry.size() > MAX_DOCUMENT_XML_BYTES {
            return Err(ConversionError::ParseFailure {
                reason: format!(
                    "{DOCUMENT_XML} declares {} bytes, over the {MAX_DOCUMENT_XML_BYTES} byte limit",
                    entry.size()
                ),
            });
        }

        let mut xml = Vec::new();
        entry
            .by_ref()
            .take(MAX_DOCUMENT_XML_BYTES)
            .read_to_end(&mut xml)
            .map_err(|e| ConversionError::ParseFailure {
                reason: format!("cannot read {DOCUMENT_XML}: {e}"),
            })?;
        Ok(xml)
    }
}

impl DocumentReader for DocxReader {
    fn validate(&self, bytes: &[u8]) -> Result<(), ConversionError> {
        let archive = Self::open_archive(bytes)?;
        for required in REQUIRED_ENTRIES {
            if !archive.file_names().any(|name| name == required) {
                return Err(ConversionError::missing_entry(required));
            }
        }
        Ok(())
    }

    fn paragraphs(&self, bytes: &[u8]) -> Result<Paragraphs, ConversionError> {
        let xml = Self::read_document_xml(bytes)?;
        log::debug!("{}: {} bytes of {DOCUMENT_XML}", self.name(), xml.len());
        Ok(Box::new(ParagraphStream::new(xml)))
    }

    fn name(&self) -> &str {
        "DocxReader"
    }
}
