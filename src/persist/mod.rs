/// Uploaded asset storage.
pub mod assets;
/// Single-file document sink.
pub mod file;

use thiserror::Error;

/// Failure reading or writing persisted state.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Filesystem failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Encoding failure.
    #[error("encode error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Result alias for persistence operations.
pub type PersistResult<T> = Result<T, PersistError>;

/// Whole-document storage backing one collection.
///
/// Implementations read and write the complete document; there is no partial
/// update and no locking.
pub trait DocumentSink: Send + Sync {
    /// Returns the full current document.
    fn read_document(&self) -> PersistResult<Vec<u8>>;

    /// Replaces the full document with `bytes`.
    fn write_document(&self, bytes: &[u8]) -> PersistResult<()>;

    /// Creates the document with `empty` content if it does not exist yet.
    ///
    /// Returns `true` when the document was created.
    fn ensure_document(&self, empty: &[u8]) -> PersistResult<bool>;

    /// Human-readable location used in logs.
    fn describe(&self) -> String {
        "document".to_string()
    }
}
