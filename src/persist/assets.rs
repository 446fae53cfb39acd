//! Uploaded asset storage under a content directory.

use std::{
    fs,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use crate::types::{AssetRef, UploadedFile};

use super::PersistResult;

/// URL prefix under which saved assets are referenced and served.
pub const DEFAULT_ASSET_PREFIX: &str = "images";

/// Writes uploaded blobs to disk and hands out stable references.
///
/// Files are named `<millis>-<original name>`. Two uploads with the same name
/// in the same millisecond collide and the later one wins.
#[derive(Debug, Clone)]
pub struct AssetStore {
    dir: PathBuf,
    prefix: String,
}

impl AssetStore {
    /// Stores assets in `dir`, referenced as `images/<file>`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self::with_prefix(dir, DEFAULT_ASSET_PREFIX)
    }

    /// Stores assets in `dir`, referenced as `<prefix>/<file>`.
    pub fn with_prefix(dir: impl AsRef<Path>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            prefix: prefix.into().trim_matches('/').to_string(),
        }
    }

    /// Content directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the content directory if missing. Returns `true` when created.
    pub fn initialize(&self) -> PersistResult<bool> {
        if self.dir.is_dir() {
            return Ok(false);
        }
        fs::create_dir_all(&self.dir)?;
        Ok(true)
    }

    /// Persists one upload and returns its reference.
    pub fn save(&self, original_name: &str, bytes: &[u8]) -> PersistResult<AssetRef> {
        let file_name = format!("{}-{}", now_ms(), sanitize_name(original_name));
        fs::write(self.dir.join(&file_name), bytes)?;
        tracing::debug!(file = %file_name, size = bytes.len(), "asset saved");
        Ok(format!("{}/{}", self.prefix, file_name))
    }

    /// Persists uploads in order, returning one reference per file.
    pub fn save_many(&self, files: &[UploadedFile]) -> PersistResult<Vec<AssetRef>> {
        files
            .iter()
            .map(|file| self.save(&file.original_name, &file.bytes))
            .collect()
    }

    /// Maps a reference produced by [`AssetStore::save`] back to its file.
    pub fn resolve(&self, reference: &str) -> Option<PathBuf> {
        let name = reference
            .strip_prefix(self.prefix.as_str())?
            .strip_prefix('/')?;
        if name.is_empty() || name.contains('/') || name.contains('\\') || name == ".." {
            return None;
        }
        Some(self.dir.join(name))
    }
}

// Only the last path component of a client-supplied name is kept.
fn sanitize_name(original_name: &str) -> String {
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    if base.is_empty() || base == "." || base == ".." {
        "upload".to_string()
    } else {
        base.to_string()
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
