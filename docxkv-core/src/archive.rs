//! Bundling several converted outputs into one ZIP download

use crate::error::ConversionError;
use chrono::{DateTime, Utc};
use std::io::{Cursor, Write};
use zip::result::ZipError;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// `converted_documents_20240102_030405.zip`
pub fn archive_file_name(created_at: DateTime<Utc>) -> String {
    format!(
        "converted_documents_{}.zip",
        created_at.format("%Y%m%d_%H%M%S")
    )
}

/// Deflate every `(file name, contents)` pair into an in-memory ZIP, in order
pub fn bundle<'a, I>(files: I) -> Result<Vec<u8>, ConversionError>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, contents) in files {
        writer.start_file(name, options)?;
        writer
            .write_all(contents.as_bytes())
            .map_err(ZipError::from)?;
    }

    Ok(writer.finish()?.into_inner())
}
