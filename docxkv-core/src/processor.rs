use crate::classifier::{LineClassifier, LineOutcome};
use crate::clock::{Clock, SystemClock};
use crate::config::{ConverterConfig, DuplicateKeyPolicy};
use crate::error::{ConversionError, ConversionWarning};
use crate::reader::{DocumentReader, DocumentSource, DocxReader};
use crate::types::*;
use chrono::{DateTime, Utc};

/// Accumulates one Record from raw paragraph text.
///
/// Blank lines bump only the total counter. Key/value lines upsert according to
/// the duplicate-key policy; free text is appended under `free_text`.
pub struct RecordBuilder<'c> {
    classifier: &'c LineClassifier,
    duplicate_keys: DuplicateKeyPolicy,
    content: Content,
    total_paragraphs: usize,
    non_empty_paragraphs: usize,
}

impl<'c> RecordBuilder<'c> {
    pub fn new(classifier: &'c LineClassifier, duplicate_keys: DuplicateKeyPolicy) -> Self {
        Self {
            classifier,
            duplicate_keys,
            content: Content::new(),
            total_paragraphs: 0,
            non_empty_paragraphs: 0,
        }
    }

    pub fn push_paragraph(&mut self, raw: &str) {
        self.total_paragraphs += 1;
        match self.classifier.classify(raw) {
            LineOutcome::Blank => {}
            LineOutcome::KeyValue { key, value } => {
                self.non_empty_paragraphs += 1;
                self.insert_pair(key, value);
            }
            LineOutcome::FreeText(text) => {
                self.non_empty_paragraphs += 1;
                self.append_free_text(text);
            }
        }
    }

    fn insert_pair(&mut self, key: &str, value: &str) {
        let policy = self.duplicate_keys;
        if let Some(existing) = self.content.get_mut(key) {
            match policy {
                // Keeps the key's original position
                DuplicateKeyPolicy::Overwrite => *existing = ContentValue::Text(value.to_string()),
                DuplicateKeyPolicy::Collect => existing.push(value.to_string()),
            }
            return;
        }
        self.content
            .insert(key.to_string(), ContentValue::Text(value.to_string()));
    }

    fn append_free_text(&mut self, text: &str) {
        // A literal "free_text: ..." line may have claimed the key as Text first
        self.content
            .entry(FREE_TEXT_KEY.to_string())
            .or_insert_with(|| ContentValue::List(Vec::new()))
            .push(text.to_string());
    }

    pub fn finish(self, source_name: &str, converted_at: DateTime<Utc>) -> ParsedDocument {
        let record = Record {
            metadata: RecordMetadata {
                source_name: source_name.to_string(),
                converted_at,
                total_paragraph_count: self.total_paragraphs,
                non_empty_paragraph_count: self.non_empty_paragraphs,
            },
            content: self.content,
        };

        let mut warnings = Vec::new();
        if record.is_empty() {
            warnings.push(ConversionWarning::EmptyContent);
        }
        ParsedDocument { record, warnings }
    }
}

/// Document-to-Record parser.
///
/// Drives a reader's paragraph stream through the line classifier. Reader and
/// clock are injected so tests run without real files or real time.
pub struct DocumentProcessor {
    reader: Box<dyn DocumentReader>,
    classifier: LineClassifier,
    clock: Box<dyn Clock>,
    duplicate_keys: DuplicateKeyPolicy,
}

impl DocumentProcessor {
    /// Create DocumentProcessor with full dependency injection
    pub fn new_with_dependencies(
        reader: Box<dyn DocumentReader>,
        clock: Box<dyn Clock>,
        config: &ConverterConfig,
    ) -> Self {
        Self {
            reader,
            classifier: LineClassifier::new(),
            clock,
            duplicate_keys: config.duplicate_keys,
        }
    }

    /// DOCX reader and wall-clock time
    pub fn new(config: &ConverterConfig) -> Self {
        Self::new_with_dependencies(Box::new(DocxReader::new()), Box::new(SystemClock), config)
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Parse one document. Failures come back as values; nothing here panics
    /// or aborts the caller's batch.
    pub fn parse(&self, source: &DocumentSource<'_>, label: &str) -> ParseOutcome {
        let paragraphs = match self.reader.open(source) {
            Ok(paragraphs) => paragraphs,
            Err(ConversionError::LockFileSkip { name }) => {
                log::debug!("{}: lock file {name} skipped", self.reader.name());
                return ParseOutcome::Skipped { name };
            }
            Err(e) => return ParseOutcome::Failed(e),
        };

        let mut builder = RecordBuilder::new(&self.classifier, self.duplicate_keys);
        for paragraph in paragraphs {
            match paragraph {
                Ok(text) => builder.push_paragraph(&text),
                Err(e) => return ParseOutcome::Failed(e),
            }
        }

        let parsed = builder.finish(label, self.clock.now());
        log::debug!(
            "{label}: {} paragraphs, {} with content, {} keys",
            parsed.record.metadata.total_paragraph_count,
            parsed.record.metadata.non_empty_paragraph_count,
            parsed.record.content.len()
        );
        ParseOutcome::Parsed(parsed)
    }

    /// Build a record straight from paragraph strings, bypassing the reader
    pub fn parse_paragraphs<I, S>(&self, label: &str, paragraphs: I) -> ParsedDocument
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = RecordBuilder::new(&self.classifier, self.duplicate_keys);
        for paragraph in paragraphs {
            builder.push_paragraph(paragraph.as_ref());
        }
        builder.finish(label, self.clock.now())
    }
}
