//! File-backed implementation of [`crate::persist::DocumentSink`].

use std::{
    fs,
    path::{Path, PathBuf},
};

use super::{DocumentSink, PersistResult};

/// A single JSON document on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileDocument {
    path: PathBuf,
}

impl FileDocument {
    /// Points at `path`; nothing is touched until the first read or write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentSink for FileDocument {
    fn read_document(&self) -> PersistResult<Vec<u8>> {
        Ok(fs::read(&self.path)?)
    }

    // Truncate-and-write, not atomic against a crash mid-write.
    fn write_document(&self, bytes: &[u8]) -> PersistResult<()> {
        fs::write(&self.path, bytes)?;
        Ok(())
    }

    fn ensure_document(&self, empty: &[u8]) -> PersistResult<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, empty)?;
        Ok(true)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
