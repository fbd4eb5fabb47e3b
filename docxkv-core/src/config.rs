use anyhow::Result;
use serde::{Deserialize, Serialize};

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_indent_width() -> usize {
    2
}

fn default_document_extension() -> String {
    "docx".to_string()
}

fn default_output_extension() -> String {
    "json".to_string()
}

/// What to do when the same key appears on more than one line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateKeyPolicy {
    /// Last occurrence wins
    #[default]
    Overwrite,
    /// Repeated values are gathered into a list in encountered order
    Collect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// When false, `content` alone is written as the top-level object
    #[serde(default = "default_true")]
    pub include_metadata: bool,
    /// Indented JSON when true, single-line JSON otherwise
    #[serde(default = "default_true")]
    pub pretty_format: bool,
    /// Spaces per indentation level for pretty output
    #[serde(default = "default_indent_width")]
    pub indent_width: usize,
    #[serde(default)]
    pub duplicate_keys: DuplicateKeyPolicy,
    /// Extension (without dot) of documents picked up in batch mode
    #[serde(default = "default_document_extension")]
    pub document_extension: String,
    /// Extension (without dot) given to written outputs
    #[serde(default = "default_output_extension")]
    pub output_extension: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            include_metadata: true,
            pretty_format: true,
            indent_width: default_indent_width(),
            duplicate_keys: DuplicateKeyPolicy::Overwrite,
            document_extension: default_document_extension(),
            output_extension: default_output_extension(),
        }
    }
}

impl ConverterConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: ConverterConfig = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Load config from a YAML file
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load config with fallback to default
    pub fn load_with_fallback(path: Option<&str>) -> Self {
        match path {
            Some(p) => Self::load_from_file(p).unwrap_or_else(|e| {
                log::warn!("Failed to load config from {p} ({e}), using defaults");
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// `.docx`-style suffix matched against file names in batch mode
    pub fn document_suffix(&self) -> String {
        format!(".{}", self.document_extension)
    }
}
