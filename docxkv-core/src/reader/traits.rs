// Reader abstraction for document containers
//
// This module defines the boundary between container handling (ZIP package ->
// paragraph text) and record building (paragraph text -> Record). Everything
// after this point only sees strings.

use crate::error::ConversionError;
use crate::reader::DocumentSource;

/// Lazy paragraph sequence. Finite; restart by opening the source again.
pub type Paragraphs = Box<dyn Iterator<Item = Result<String, ConversionError>>>;

/// Reader trait - converts a document container into paragraph text
///
/// Opening happens in two clear steps:
/// 1. Validation: is this a well-formed package of the expected format?
/// 2. Extraction: walk the body and yield one string per paragraph
///
/// Validation never consumes the caller's buffer; extraction starts again from
/// the first byte.
pub trait DocumentReader {
    /// Step 1: Check the container before any structural parsing
    fn validate(&self, bytes: &[u8]) -> Result<(), ConversionError>;

    /// Step 2: Extract the paragraph stream from validated bytes
    fn paragraphs(&self, bytes: &[u8]) -> Result<Paragraphs, ConversionError>;

    /// Reader name for logging
    fn name(&self) -> &str;

    /// Validate then extract
    fn open_bytes(&self, bytes: &[u8]) -> Result<Paragraphs, ConversionError> {
        self.validate(bytes)?;
        self.paragraphs(bytes)
    }

    /// Main entry point: lock-file check, load, validate, extract
    fn open(&self, source: &DocumentSource<'_>) -> Result<Paragraphs, ConversionError> {
        if source.is_lock_file() {
            return Err(ConversionError::LockFileSkip {
                name: source.name().into_owned(),
            });
        }

        match source {
            DocumentSource::Path(path) => {
                let bytes = std::fs::read(path).map_err(|e| ConversionError::Io {
                    path: path.to_path_buf(),
                    source: e,
                })?;
                self.open_bytes(&bytes)
            }
            DocumentSource::Bytes { bytes, .. } => self.open_bytes(bytes),
        }
    }
}
