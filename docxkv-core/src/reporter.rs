use crate::error::{ConversionError, ConversionWarning};
use crate::types::BatchResult;
use std::path::{Path, PathBuf};

/// Result-reporting sink injected into the converter.
///
/// The converter never prints on its own; every per-document result and the
/// end-of-batch summary go through here.
pub trait ConversionReporter {
    fn converted(&mut self, source: &Path, output: &Path);
    fn skipped(&mut self, source: &Path);
    fn failed(&mut self, source: &Path, error: &ConversionError);
    fn warning(&mut self, source: &Path, warning: &ConversionWarning);
    fn batch_finished(&mut self, result: &BatchResult);
}

/// Emoji-prefixed progress lines on stdout, failures on stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl ConversionReporter for ConsoleReporter {
    fn converted(&mut self, source: &Path, output: &Path) {
        println!("✅ Converted {} → {}", source.display(), output.display());
    }

    fn skipped(&mut self, source: &Path) {
        println!("⏭️  Skipping lock file: {}", source.display());
    }

    fn failed(&mut self, source: &Path, error: &ConversionError) {
        eprintln!("❌ Failed to convert {}: {error}", source.display());
    }

    fn warning(&mut self, source: &Path, warning: &ConversionWarning) {
        println!("⚠️  {}: {warning}", source.display());
    }

    fn batch_finished(&mut self, result: &BatchResult) {
        println!(
            "\n📊 Conversion complete! {} converted, {} failed, {} skipped",
            result.succeeded(),
            result.failed(),
            result.skipped()
        );

        if result.failed() > 0 {
            let names: Vec<String> = result
                .failures()
                .map(|(source, _)| source.display().to_string())
                .collect();
            eprintln!("❌ Failed to convert: {}", names.join(", "));
        }
    }
}

/// Owned copy of one reporter call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    Converted { source: PathBuf, output: PathBuf },
    Skipped { source: PathBuf },
    Failed { source: PathBuf, message: String },
    Warning { source: PathBuf, warning: ConversionWarning },
    BatchFinished { succeeded: usize, failed: usize, skipped: usize },
}

/// Records every call in order; for tests and for callers that render later
#[derive(Debug, Clone, Default)]
pub struct CollectingReporter {
    pub events: Vec<ReportEvent>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConversionReporter for CollectingReporter {
    fn converted(&mut self, source: &Path, output: &Path) {
        self.events.push(ReportEvent::Converted {
            source: source.to_path_buf(),
            output: output.to_path_buf(),
        });
    }

    fn skipped(&mut self, source: &Path) {
        self.events.push(ReportEvent::Skipped {
            source: source.to_path_buf(),
        });
    }

    fn failed(&mut self, source: &Path, error: &ConversionError) {
        self.events.push(ReportEvent::Failed {
            source: source.to_path_buf(),
            message: error.to_string(),
        });
    }

    fn warning(&mut self, source: &Path, warning: &ConversionWarning) {
        self.events.push(ReportEvent::Warning {
            source: source.to_path_buf(),
            warning: warning.clone(),
        });
    }

    fn batch_finished(&mut self, result: &BatchResult) {
        self.events.push(ReportEvent::BatchFinished {
            succeeded: result.succeeded(),
            failed: result.failed(),
            skipped: result.skipped(),
        });
    }
}
