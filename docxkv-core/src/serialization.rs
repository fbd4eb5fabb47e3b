use crate::config::ConverterConfig;
use crate::types::Record;
use serde::Serialize;
use serde_json::ser::{CompactFormatter, PrettyFormatter, Serializer};

/// How a Record is rendered to JSON text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonOptions {
    /// When false, only `content` is written as the top-level object
    pub include_metadata: bool,
    /// `Some(width)` for indented output, `None` for a single line
    pub indent: Option<usize>,
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self {
            include_metadata: true,
            indent: Some(2),
        }
    }
}

impl From<&ConverterConfig> for JsonOptions {
    fn from(config: &ConverterConfig) -> Self {
        Self {
            include_metadata: config.include_metadata,
            indent: config.pretty_format.then_some(config.indent_width),
        }
    }
}

impl Record {
    /// Render as JSON: metadata before content, non-ASCII written verbatim
    pub fn to_json(&self, options: &JsonOptions) -> serde_json::Result<String> {
        if options.include_metadata {
            write_json(self, options.indent)
        } else {
            write_json(&self.content, options.indent)
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        self.to_json(&JsonOptions::default())
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

fn write_json<T: Serialize + ?Sized>(value: &T, indent: Option<usize>) -> serde_json::Result<String> {
    let mut out = Vec::new();
    match indent {
        Some(width) => {
            let indent = vec![b' '; width];
            let mut serializer =
                Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(&indent));
            value.serialize(&mut serializer)?;
        }
        None => {
            let mut serializer = Serializer::with_formatter(&mut out, CompactFormatter);
            value.serialize(&mut serializer)?;
        }
    }
    // serde_json only ever writes valid UTF-8
    Ok(String::from_utf8_lossy(&out).into_owned())
}
