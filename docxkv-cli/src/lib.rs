// All conversion logic lives in docxkv-core.
// This crate maps command-line arguments onto a configured Converter.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use docxkv_core::{
    ConsoleReporter, Converter, ConverterConfig, Download, DocumentProcessor, DuplicateKeyPolicy,
    FileStorage, NoOpStorage, OutputStorage,
};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "docxkv")]
#[command(about = "Convert Word documents of 'key: value' lines into JSON")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub options: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Default, Clone)]
pub struct GlobalOptions {
    /// Path to custom config file (YAML format)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Write only the content object, without conversion metadata
    #[arg(long, global = true)]
    pub no_metadata: bool,

    /// Single-line JSON instead of indented output
    #[arg(long, global = true)]
    pub compact: bool,

    /// Keep every value of a repeated key as a list instead of the last one
    #[arg(long, global = true)]
    pub collect_duplicates: bool,

    /// Parse and report without writing any output
    #[arg(long, global = true)]
    pub dry_run: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert one document (output defaults to <INPUT> with a .json extension)
    Convert {
        input: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert every document under a folder, mirroring its tree
    Batch {
        source: PathBuf,

        /// Destination root (defaults to the source folder)
        #[arg(short, long)]
        dest: Option<PathBuf>,
    },

    /// Convert several files and save one download: a JSON file for a
    /// single success, a ZIP archive otherwise
    Bundle {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Directory the download is saved into
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
}

impl GlobalOptions {
    /// Load the YAML config (if any) and apply flag overrides on top
    pub fn resolve_config(&self) -> ConverterConfig {
        let mut config = ConverterConfig::load_with_fallback(self.config.as_deref());

        if self.no_metadata {
            config.include_metadata = false;
        }
        if self.compact {
            config.pretty_format = false;
        }
        if self.collect_duplicates {
            config.duplicate_keys = DuplicateKeyPolicy::Collect;
        }
        config
    }

    fn storage(&self) -> Box<dyn OutputStorage> {
        if self.dry_run {
            Box::new(NoOpStorage::new())
        } else {
            Box::new(FileStorage::new())
        }
    }
}

/// Build the console converter for these options
pub fn build_converter(options: &GlobalOptions) -> Converter<ConsoleReporter> {
    let config = options.resolve_config();
    let processor = DocumentProcessor::new(&config);
    Converter::new_with_dependencies(processor, options.storage(), ConsoleReporter, config)
}

/// Run one command; the returned value is the process exit code
pub fn run(cli: Cli) -> Result<i32> {
    let mut converter = build_converter(&cli.options);

    match cli.command {
        Command::Convert { input, output } => {
            if !input.exists() {
                bail!("Input document not found: {}", input.display());
            }
            let outcome = converter.convert_one(&input, output.as_deref());
            Ok(if outcome.is_failed() { 1 } else { 0 })
        }
        Command::Batch { source, dest } => {
            let result = converter
                .convert_many(&source, dest.as_deref())
                .with_context(|| format!("Batch conversion of {} aborted", source.display()))?;
            Ok(if result.failed() > 0 { 1 } else { 0 })
        }
        Command::Bundle { files, output } => {
            let result = converter.convert_upload_paths(&files);

            match result.download()? {
                Some(download) => {
                    let path = save_download(&download, &output, cli.options.dry_run)?;
                    println!("💾 Saved {}", path.display());
                }
                None => eprintln!("⚠️  Nothing converted, no download produced"),
            }
            Ok(if result.batch.failed() > 0 { 1 } else { 0 })
        }
    }
}

fn save_download(download: &Download, dir: &Path, dry_run: bool) -> Result<PathBuf> {
    let path = dir.join(download.file_name());
    if dry_run {
        return Ok(path);
    }
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Cannot create output directory {}", dir.display()))?;
    std::fs::write(&path, download.bytes())
        .with_context(|| format!("Cannot write {}", path.display()))?;
    Ok(path)
}
