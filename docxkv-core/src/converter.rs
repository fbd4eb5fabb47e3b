use crate::archive;
use crate::config::ConverterConfig;
use crate::error::{ConversionError, ConversionWarning};
use crate::processor::DocumentProcessor;
use crate::reader::DocumentSource;
use crate::reporter::{ConsoleReporter, ConversionReporter};
use crate::serialization::JsonOptions;
use crate::storage::{FileStorage, OutputStorage};
use crate::types::*;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::borrow::Borrow;
use std::fs;
use std::path::{Path, PathBuf};

/// One document handed over by an interactive caller
#[derive(Debug, Clone)]
pub struct Upload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a file from disk, keeping only its base name
    pub fn from_path(path: &Path) -> Result<Self, ConversionError> {
        let bytes = fs::read(path).map_err(|e| ConversionError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self::new(DocumentSource::path(path).name(), bytes))
    }
}

/// What an interactive caller offers for download
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Download {
    Json { file_name: String, contents: String },
    Archive { file_name: String, bytes: Vec<u8> },
}

impl Download {
    pub fn file_name(&self) -> &str {
        match self {
            Download::Json { file_name, .. } | Download::Archive { file_name, .. } => file_name,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            Download::Json { contents, .. } => contents.as_bytes(),
            Download::Archive { bytes, .. } => bytes,
        }
    }
}

/// Outcome of converting a set of uploads
#[derive(Debug)]
pub struct UploadResult {
    pub batch: BatchResult,
    /// Output file name → rendered JSON, in upload order
    pub files: IndexMap<String, String>,
    pub finished_at: DateTime<Utc>,
}

impl UploadResult {
    /// One converted file downloads as itself; several are bundled into a ZIP
    pub fn download(&self) -> Result<Option<Download>, ConversionError> {
        match self.files.len() {
            0 => Ok(None),
            1 => Ok(self.files.iter().next().map(|(name, json)| Download::Json {
                file_name: name.clone(),
                contents: json.clone(),
            })),
            _ => {
                let bytes =
                    archive::bundle(self.files.iter().map(|(name, json)| (name.as_str(), json.as_str())))?;
                Ok(Some(Download::Archive {
                    file_name: archive::archive_file_name(self.finished_at),
                    bytes,
                }))
            }
        }
    }
}

/// Conversion orchestrator.
///
/// Runs the record parser over one file, a folder tree, or a set of uploads,
/// strictly one document at a time. Per-document problems become outcomes;
/// only failing to create an output directory stops a batch.
pub struct Converter<R: ConversionReporter = ConsoleReporter> {
    processor: DocumentProcessor,
    storage: Box<dyn OutputStorage>,
    reporter: R,
    config: ConverterConfig,
}

impl Converter<ConsoleReporter> {
    /// DOCX reader, wall clock, filesystem output, console reporting
    pub fn new(config: ConverterConfig) -> Self {
        let processor = DocumentProcessor::new(&config);
        Self::new_with_dependencies(processor, Box::new(FileStorage::new()), ConsoleReporter, config)
    }
}

impl<R: ConversionReporter> Converter<R> {
    /// Create Converter with full dependency injection
    pub fn new_with_dependencies(
        processor: DocumentProcessor,
        storage: Box<dyn OutputStorage>,
        reporter: R,
        config: ConverterConfig,
    ) -> Self {
        Self {
            processor,
            storage,
            reporter,
            config,
        }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn into_reporter(self) -> R {
        self.reporter
    }

    fn json_options(&self) -> JsonOptions {
        JsonOptions::from(&self.config)
    }

    /// `dir/report.docx` → `dir/report.json`
    pub fn default_output_path(&self, source: &Path) -> PathBuf {
        source.with_extension(&self.config.output_extension)
    }

    fn output_file_name(&self, source: &Path) -> PathBuf {
        PathBuf::from(source.file_name().unwrap_or_default())
            .with_extension(&self.config.output_extension)
    }

    /// Single mode: convert one file, next to the source unless a destination
    /// is given. The destination's directory must already exist.
    pub fn convert_one(&mut self, source: &Path, destination: Option<&Path>) -> ConversionOutcome {
        let output = destination
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.default_output_path(source));

        let outcome = self
            .convert_path(source, output, None)
            .unwrap_or_else(|error| ConversionOutcome::Failed {
                source: source.to_path_buf(),
                error,
            });
        self.report(&outcome);
        outcome
    }

    /// Batch mode: convert every document under `source_root`, mirroring the
    /// directory tree under `destination_root` (default: `source_root`).
    ///
    /// Returns `Err` only when the tree cannot be listed or an output
    /// directory cannot be created.
    pub fn convert_many(
        &mut self,
        source_root: &Path,
        destination_root: Option<&Path>,
    ) -> Result<BatchResult, ConversionError> {
        let destination_root = destination_root.unwrap_or(source_root);
        self.storage.ensure_dir(destination_root)?;

        let documents = discover_documents(source_root, &self.config.document_suffix())?;
        log::info!(
            "Found {} document(s) under {}",
            documents.len(),
            source_root.display()
        );

        let mut result = BatchResult::new();
        for source in documents {
            let relative_dir = source
                .parent()
                .and_then(|parent| parent.strip_prefix(source_root).ok())
                .unwrap_or_else(|| Path::new(""));
            let target_dir = destination_root.join(relative_dir);
            let output = target_dir.join(self.output_file_name(&source));

            let outcome = self.convert_path(&source, output, Some(&target_dir))?;
            self.report(&outcome);
            result.push(outcome);
        }

        self.reporter.batch_finished(&result);
        Ok(result)
    }

    /// Interactive mode: convert in-memory documents, applying the
    /// `include_metadata` / `pretty_format` settings, without touching disk
    pub fn convert_uploads(&mut self, uploads: &[Upload]) -> UploadResult {
        self.convert_upload_results(uploads.iter().map(Ok))
    }

    /// Interactive mode over files on disk. Each file is read just before it
    /// is converted; an unreadable file becomes that file's failure.
    pub fn convert_upload_paths<P: AsRef<Path>>(&mut self, paths: &[P]) -> UploadResult {
        self.convert_upload_results(paths.iter().map(|path| {
            let path = path.as_ref();
            Upload::from_path(path).map_err(|error| (path.to_path_buf(), error))
        }))
    }

    fn convert_upload_results<U, I>(&mut self, uploads: I) -> UploadResult
    where
        U: Borrow<Upload>,
        I: IntoIterator<Item = Result<U, (PathBuf, ConversionError)>>,
    {
        let mut batch = BatchResult::new();
        let mut files = IndexMap::new();

        for upload in uploads {
            let outcome = match upload {
                Ok(upload) => self.convert_upload(upload.borrow(), &mut files),
                Err((source, error)) => ConversionOutcome::Failed { source, error },
            };
            self.report(&outcome);
            batch.push(outcome);
        }

        self.reporter.batch_finished(&batch);
        UploadResult {
            batch,
            files,
            finished_at: self.processor.now(),
        }
    }

    fn convert_upload(
        &self,
        upload: &Upload,
        files: &mut IndexMap<String, String>,
    ) -> ConversionOutcome {
        let source = PathBuf::from(&upload.name);
        let document = DocumentSource::bytes(&upload.name, &upload.bytes);

        let mut parsed = match self.processor.parse(&document, &upload.name) {
            ParseOutcome::Parsed(parsed) => parsed,
            ParseOutcome::Skipped { .. } => return ConversionOutcome::Skipped { source },
            ParseOutcome::Failed(error) => return ConversionOutcome::Failed { source, error },
        };

        let json = match parsed.record.to_json(&self.json_options()) {
            Ok(json) => json,
            Err(e) => {
                return ConversionOutcome::Failed {
                    source,
                    error: e.into(),
                }
            }
        };

        let output = self.output_file_name(&source);
        let file_name = output.to_string_lossy().into_owned();
        if files.insert(file_name.clone(), json).is_some() {
            log::warn!("{file_name} produced twice, keeping the later upload");
            parsed
                .warnings
                .push(ConversionWarning::OutputReplaced { file_name });
        }

        ConversionOutcome::Converted {
            source,
            output,
            record: parsed.record,
            warnings: parsed.warnings,
        }
    }

    /// Parse, then write. `Err` is reserved for errors that must stop a batch.
    fn convert_path(
        &self,
        source: &Path,
        output: PathBuf,
        output_dir: Option<&Path>,
    ) -> Result<ConversionOutcome, ConversionError> {
        let label = DocumentSource::path(source).name().into_owned();
        let parsed = match self.processor.parse(&DocumentSource::path(source), &label) {
            ParseOutcome::Parsed(parsed) => parsed,
            ParseOutcome::Skipped { .. } => {
                return Ok(ConversionOutcome::Skipped {
                    source: source.to_path_buf(),
                })
            }
            ParseOutcome::Failed(error) => {
                return Ok(ConversionOutcome::Failed {
                    source: source.to_path_buf(),
                    error,
                })
            }
        };

        if let Some(dir) = output_dir {
            self.storage.ensure_dir(dir)?;
        }

        let written = parsed
            .record
            .to_json(&self.json_options())
            .map_err(ConversionError::from)
            .and_then(|json| self.storage.write(&output, &json));

        Ok(match written {
            Ok(()) => ConversionOutcome::Converted {
                source: source.to_path_buf(),
                output,
                record: parsed.record,
                warnings: parsed.warnings,
            },
            Err(error) => ConversionOutcome::Failed {
                source: source.to_path_buf(),
                error,
            },
        })
    }

    fn report(&mut self, outcome: &ConversionOutcome) {
        match outcome {
            ConversionOutcome::Converted {
                source,
                output,
                warnings,
                ..
            } => {
                for warning in warnings {
                    self.reporter.warning(source, warning);
                }
                self.reporter.converted(source, output);
            }
            ConversionOutcome::Skipped { source } => self.reporter.skipped(source),
            ConversionOutcome::Failed { source, error } => self.reporter.failed(source, error),
        }
    }
}

/// Every file under `root` whose name ends with `suffix` (case as stored).
///
/// Entries are visited in sorted order so repeated runs see the same sequence.
/// An unreadable root is an error; unreadable subdirectories are logged and
/// skipped.
pub fn discover_documents(root: &Path, suffix: &str) -> Result<Vec<PathBuf>, ConversionError> {
    let mut found = Vec::new();
    walk(root, suffix, &mut found).map_err(|e| ConversionError::Io {
        path: root.to_path_buf(),
        source: e,
    })?;
    Ok(found)
}

fn walk(dir: &Path, suffix: &str, found: &mut Vec<PathBuf>) -> std::io::Result<()> {
    let mut entries = fs::read_dir(dir)?.collect::<Result<Vec<_>, _>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            if let Err(e) = walk(&path, suffix, found) {
                log::warn!("Skipping unreadable directory {}: {e}", path.display());
            }
        } else if entry.file_name().to_string_lossy().ends_with(suffix) {
            found.push(path);
        }
    }
    Ok(())
}
