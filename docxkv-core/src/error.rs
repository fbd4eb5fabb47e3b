use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Per-document failure taxonomy.
///
/// Everything except `OutputDirectory` is scoped to a single document: the
/// converter records it on that document's outcome and moves on.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// Editor lock artifact (`~$name.docx`). Informational, never a failure.
    #[error("skipping lock file: {name}")]
    LockFileSkip { name: String },

    /// Not a ZIP package, or a mandatory DOCX entry is missing.
    #[error("invalid format: {reason}")]
    InvalidFormat { reason: String },

    /// The package opened but paragraph extraction failed.
    #[error("parse failure: {reason}")]
    ParseFailure { reason: String },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Aborts a batch run.
    #[error("cannot create output directory {}: {source}", path.display())]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to build archive: {0}")]
    Archive(#[from] zip::result::ZipError),
}

impl ConversionError {
    pub fn missing_entry(entry: &str) -> Self {
        ConversionError::InvalidFormat {
            reason: format!("missing required file: {entry}"),
        }
    }

    pub fn is_lock_file_skip(&self) -> bool {
        matches!(self, ConversionError::LockFileSkip { .. })
    }

    /// Errors that must stop a batch instead of being recorded per document
    pub fn is_fatal(&self) -> bool {
        matches!(self, ConversionError::OutputDirectory { .. })
    }
}

/// Non-fatal conditions attached to an otherwise successful conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionWarning {
    /// A record was produced but its content mapping is empty
    EmptyContent,
    /// Another upload in the same call already produced this output name;
    /// the later one replaces it
    OutputReplaced { file_name: String },
}

impl fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionWarning::EmptyContent => write!(
                f,
                "no content found (document might be empty or use unsupported formatting)"
            ),
            ConversionWarning::OutputReplaced { file_name } => {
                write!(f, "{file_name} was already produced by an earlier upload and is replaced")
            }
        }
    }
}
