// docxkv Core Library
//
// Extracts `key: value` records from Word documents and writes them as JSON.
// Reader → classifier → record parser → converter, each behind its own module.

pub mod archive;
pub mod classifier;
pub mod clock;
pub mod config;
pub mod converter;
pub mod error;
pub mod processor;
pub mod reader;
pub mod reporter;
pub mod serialization;
pub mod storage;
pub mod types;

#[cfg(test)]
mod test_support;

// Re-export main types and functions for easy use
pub use types::*;
pub use classifier::{LineClassifier, LineOutcome};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConverterConfig, DuplicateKeyPolicy};
pub use converter::{discover_documents, Converter, Download, Upload, UploadResult};
pub use error::{ConversionError, ConversionWarning};
pub use processor::DocumentProcessor;
pub use reader::{DocumentReader, DocumentSource, DocxReader};
pub use reporter::{CollectingReporter, ConsoleReporter, ConversionReporter, ReportEvent};
pub use serialization::JsonOptions;
pub use storage::{FileStorage, NoOpStorage, OutputStorage};
