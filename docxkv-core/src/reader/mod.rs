//! Document Readers
//!
//! This module turns a document container into the ordered sequence of
//! paragraph texts that the record parser consumes.
//!
//! ## Architecture
//!
//! ```text
//! DocumentSource (path or named byte buffer)
//!     ↓
//! [Lock-file check] → LockFileSkip
//!     ↓
//! [Package validation] → InvalidFormat
//!     ↓
//! ParagraphStream (raw paragraph text, document order)
//!     ↓
//! [Record parser]
//! ```
//!
//! ## Available Readers
//!
//! - `DocxReader` - Word documents (`.docx`) via `zip` + `quick-xml`

pub mod docx;
pub mod traits;

use std::borrow::Cow;
use std::path::Path;

// Re-export main types
pub use docx::{DocxReader, ParagraphStream};
pub use traits::DocumentReader;

/// File-name prefix of transient editor lock artifacts
pub const LOCK_FILE_PREFIX: &str = "~$";

/// Where a document's bytes come from
#[derive(Debug, Clone, Copy)]
pub enum DocumentSource<'a> {
    Path(&'a Path),
    /// In-memory buffer, e.g. an uploaded file, with its display name
    Bytes { name: &'a str, bytes: &'a [u8] },
}

impl<'a> DocumentSource<'a> {
    pub fn path(path: &'a Path) -> Self {
        DocumentSource::Path(path)
    }

    pub fn bytes(name: &'a str, bytes: &'a [u8]) -> Self {
        DocumentSource::Bytes { name, bytes }
    }

    /// Base name used for lock-file detection and as default record label
    pub fn name(&self) -> Cow<'a, str> {
        match self {
            DocumentSource::Path(path) => path
                .file_name()
                .map(|name| name.to_string_lossy())
                .unwrap_or_else(|| path.to_string_lossy()),
            DocumentSource::Bytes { name, .. } => Cow::Borrowed(name),
        }
    }

    pub fn is_lock_file(&self) -> bool {
        self.name().starts_with(LOCK_FILE_PREFIX)
    }
}
