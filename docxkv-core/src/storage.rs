use crate::error::ConversionError;
use std::fs;
use std::path::Path;

/// Storage abstraction for converted output
pub trait OutputStorage {
    /// Create `dir` and any missing parents
    fn ensure_dir(&self, dir: &Path) -> Result<(), ConversionError>;

    fn write(&self, path: &Path, contents: &str) -> Result<(), ConversionError>;
}

/// Writes outputs to the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FileStorage;

impl FileStorage {
    pub fn new() -> Self {
        Self
    }
}

impl OutputStorage for FileStorage {
    fn ensure_dir(&self, dir: &Path) -> Result<(), ConversionError> {
        if dir.as_os_str().is_empty() {
            return Ok(());
        }
        fs::create_dir_all(dir).map_err(|e| ConversionError::OutputDirectory {
            path: dir.to_path_buf(),
            source: e,
        })
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), ConversionError> {
        fs::write(path, contents).map_err(|e| ConversionError::Write {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// No-op storage: parses and reports but never touches the disk (dry runs)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpStorage;

impl NoOpStorage {
    pub fn new() -> Self {
        Self
    }
}

impl OutputStorage for NoOpStorage {
    fn ensure_dir(&self, _dir: &Path) -> Result<(), ConversionError> {
        Ok(()) // No-op
    }

    fn write(&self, _path: &Path, _contents: &str) -> Result<(), ConversionError> {
        Ok(()) // No-op
    }
}
