use crate::error::{ConversionError, ConversionWarning};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Reserved content key collecting paragraphs that have no `key: value` shape
pub const FREE_TEXT_KEY: &str = "free_text";

// ===== RECORD TYPES =====
// A Record is built once per document and never mutated afterwards.
// Field order here is the field order of the JSON output.

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMetadata {
    /// File basename in batch mode, upload name in interactive mode
    #[serde(rename = "source_file")]
    pub source_name: String,
    pub converted_at: DateTime<Utc>,
    /// Every paragraph in the document body, blanks included
    #[serde(rename = "total_paragraphs")]
    pub total_paragraph_count: usize,
    /// Paragraphs that were non-blank after trimming
    #[serde(rename = "content_paragraphs")]
    pub non_empty_paragraph_count: usize,
}

/// Value stored under a content key.
///
/// `free_text` is always a `List`. Ordinary keys are `Text` unless the
/// duplicate-key policy collects repeated values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentValue {
    Text(String),
    List(Vec<String>),
}

impl ContentValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentValue::Text(text) => Some(text),
            ContentValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            ContentValue::List(items) => Some(items),
            ContentValue::Text(_) => None,
        }
    }

    /// Append a value, turning a single `Text` into a two-element `List`
    pub fn push(&mut self, value: String) {
        match self {
            ContentValue::List(items) => items.push(value),
            ContentValue::Text(first) => {
                let first = std::mem::take(first);
                *self = ContentValue::List(vec![first, value]);
            }
        }
    }
}

/// Ordered key → value mapping; insertion order is document order
pub type Content = IndexMap<String, ContentValue>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub metadata: RecordMetadata,
    pub content: Content,
}

impl Record {
    pub fn get(&self, key: &str) -> Option<&ContentValue> {
        self.content.get(key)
    }

    pub fn free_text(&self) -> Option<&[String]> {
        self.content.get(FREE_TEXT_KEY).and_then(ContentValue::as_list)
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Number of key/value pairs, not counting `free_text`
    pub fn pair_count(&self) -> usize {
        self.content
            .keys()
            .filter(|key| key.as_str() != FREE_TEXT_KEY)
            .count()
    }
}

// ===== PARSER OUTCOMES =====

/// A successfully parsed document together with any non-fatal warnings
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub record: Record,
    pub warnings: Vec<ConversionWarning>,
}

/// Result of parsing one document source. Never carries a panic or an
/// unwinding error: every failure is a value.
#[derive(Debug)]
pub enum ParseOutcome {
    Parsed(ParsedDocument),
    Skipped { name: String },
    Failed(ConversionError),
}

impl ParseOutcome {
    pub fn record(&self) -> Option<&Record> {
        match self {
            ParseOutcome::Parsed(parsed) => Some(&parsed.record),
            _ => None,
        }
    }

    pub fn into_record(self) -> Option<Record> {
        match self {
            ParseOutcome::Parsed(parsed) => Some(parsed.record),
            _ => None,
        }
    }
}

// ===== ORCHESTRATOR OUTCOMES =====

#[derive(Debug)]
pub enum ConversionOutcome {
    Converted {
        source: PathBuf,
        output: PathBuf,
        record: Record,
        warnings: Vec<ConversionWarning>,
    },
    Skipped {
        source: PathBuf,
    },
    Failed {
        source: PathBuf,
        error: ConversionError,
    },
}

impl ConversionOutcome {
    pub fn source(&self) -> &Path {
        match self {
            ConversionOutcome::Converted { source, .. }
            | ConversionOutcome::Skipped { source }
            | ConversionOutcome::Failed { source, .. } => source,
        }
    }

    pub fn output(&self) -> Option<&Path> {
        match self {
            ConversionOutcome::Converted { output, .. } => Some(output),
            _ => None,
        }
    }

    pub fn record(&self) -> Option<&Record> {
        match self {
            ConversionOutcome::Converted { record, .. } => Some(record),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ConversionError> {
        match self {
            ConversionOutcome::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn is_converted(&self) -> bool {
        matches!(self, ConversionOutcome::Converted { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, ConversionOutcome::Skipped { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ConversionOutcome::Failed { .. })
    }
}

/// Ordered outcomes of one batch call, one entry per discovered document
#[derive(Debug, Default)]
pub struct BatchResult {
    pub outcomes: Vec<ConversionOutcome>,
}

impl BatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, outcome: ConversionOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_converted()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_skipped()).count()
    }

    /// Output paths of successful conversions, in processing order
    pub fn converted_paths(&self) -> Vec<&Path> {
        self.outcomes.iter().filter_map(ConversionOutcome::output).collect()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Path, &ConversionError)> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            ConversionOutcome::Failed { source, error } => Some((source.as_path(), error)),
            _ => None,
        })
    }
}
