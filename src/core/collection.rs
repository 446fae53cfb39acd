use std::marker::PhantomData;

use serde_json::Value;
use thiserror::Error;

use crate::{
    core::indices::check_index,
    persist::{file::FileDocument, DocumentSink, PersistError},
    record::CollectionRecord,
    types::RecordIndex,
};

/// Failure of a collection operation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing document is unreadable or not an array of records.
    #[error("corrupt document: {reason}")]
    CorruptDocument {
        /// What went wrong while loading.
        reason: String,
    },
    /// Index outside `[0, len)` of the freshly loaded sequence.
    #[error("index {index} out of range for collection of length {len}")]
    IndexOutOfRange {
        /// Requested index.
        index: RecordIndex,
        /// Length at load time.
        len: usize,
    },
    /// Writing the document or an asset failed.
    #[error("persistence failure: {0}")]
    Persistence(#[from] PersistError),
    /// The supplied index is not a non-negative integer.
    #[error("invalid index format: {0:?}")]
    InvalidIndexFormat(String),
    /// A patch named a field the record shape does not have.
    #[error("unknown field: {0}")]
    UnknownField(String),
    /// A patch value does not fit the field's type.
    #[error("invalid value for field {field}: {reason}")]
    InvalidFieldValue {
        /// Patched field.
        field: String,
        /// Decode failure detail.
        reason: String,
    },
}

impl StoreError {
    /// True for failures caused by the caller's input rather than storage.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::IndexOutOfRange { .. }
                | Self::InvalidIndexFormat(_)
                | Self::UnknownField(_)
                | Self::InvalidFieldValue { .. }
        )
    }
}

/// Result alias for collection operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Ordered records of one type persisted as a single JSON array document.
///
/// Every operation loads the whole document, works on the decoded sequence
/// and, for mutations, writes the whole sequence back. Nothing is cached
/// between calls, so indices are always checked against what is on disk now.
///
/// There is no locking: two callers mutating the same document concurrently
/// can lose one another's update. Use [`crate::runtime::handle::spawn_collection`]
/// to serialize access.
#[derive(Debug)]
pub struct JsonCollection<R, S = FileDocument> {
    sink: S,
    _record: PhantomData<fn() -> R>,
}

impl<R: CollectionRecord, S: DocumentSink> JsonCollection<R, S> {
    /// Wraps a document sink.
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            _record: PhantomData,
        }
    }

    /// Backing sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Creates the document as an empty array if it does not exist.
    pub fn initialize(&self) -> StoreResult<bool> {
        let created = self.sink.ensure_document(b"[]")?;
        if created {
            tracing::info!(
                kind = R::KIND,
                document = %self.sink.describe(),
                "created empty collection document"
            );
        }
        Ok(created)
    }

    /// Reads and decodes the full sequence.
    pub fn load(&self) -> StoreResult<Vec<R>> {
        let bytes = self.sink.read_document().map_err(|err| {
            tracing::error!(kind = R::KIND, error = %err, "collection document unreadable");
            StoreError::CorruptDocument {
                reason: format!("unreadable: {err}"),
            }
        })?;
        let records: Vec<R> = serde_json::from_slice(&bytes).map_err(|err| {
            tracing::error!(kind = R::KIND, error = %err, "collection document malformed");
            StoreError::CorruptDocument {
                reason: err.to_string(),
            }
        })?;
        tracing::debug!(kind = R::KIND, len = records.len(), "collection loaded");
        Ok(records)
    }

    /// Returns every record in order.
    pub fn list(&self) -> StoreResult<Vec<R>> {
        self.load()
    }

    /// Pushes `record` to the end; returns its index and the record.
    pub fn append(&self, record: R) -> StoreResult<(RecordIndex, R)> {
        let mut records = self.load()?;
        records.push(record.clone());
        self.persist(&records)?;
        let index = records.len() - 1;
        tracing::info!(kind = R::KIND, index, "record appended");
        Ok((index, record))
    }

    /// Overwrites the record at `index` in full.
    pub fn replace_at(&self, index: RecordIndex, record: R) -> StoreResult<()> {
        self.replace_with(index, move |_| Ok(record)).map(|_| ())
    }

    /// Replaces the record at `index` with one computed from its current value.
    ///
    /// `build` runs after the range check against the loaded sequence; if it
    /// fails nothing is written. Returns the stored replacement.
    pub fn replace_with<F>(&self, index: RecordIndex, build: F) -> StoreResult<R>
    where
        F: FnOnce(&R) -> StoreResult<R>,
    {
        let mut records = self.load()?;
        check_index(index, records.len())?;
        let replacement = build(&records[index])?;
        records[index] = replacement.clone();
        self.persist(&records)?;
        tracing::info!(kind = R::KIND, index, "record replaced");
        Ok(replacement)
    }

    /// Sets a single named field on the record at `index`.
    ///
    /// All other fields keep their current values. Returns the patched record.
    pub fn patch_field_at(
        &self,
        index: RecordIndex,
        field: &str,
        value: Value,
    ) -> StoreResult<R> {
        let mut records = self.load()?;
        check_index(index, records.len())?;

        let mut fields = serde_json::to_value(&records[index]).map_err(PersistError::from)?;
        let Some(map) = fields.as_object_mut() else {
            return Err(StoreError::UnknownField(field.to_string()));
        };
        let Some(slot) = map.get_mut(field) else {
            return Err(StoreError::UnknownField(field.to_string()));
        };
        *slot = value.clone();

        let patched: R =
            serde_json::from_value(fields).map_err(|err| StoreError::InvalidFieldValue {
                field: field.to_string(),
                reason: err.to_string(),
            })?;
        // Loading is lenient, so a value the record would coerce is rejected here.
        let stored = serde_json::to_value(&patched).map_err(PersistError::from)?;
        if stored.get(field) != Some(&value) {
            return Err(StoreError::InvalidFieldValue {
                field: field.to_string(),
                reason: format!("{value} does not fit the field's type"),
            });
        }
        records[index] = patched.clone();
        self.persist(&records)?;
        tracing::info!(kind = R::KIND, index, field, "record field patched");
        Ok(patched)
    }

    /// Removes the record at `index`, shifting later records down by one.
    pub fn delete_at(&self, index: RecordIndex) -> StoreResult<R> {
        let mut records = self.load()?;
        check_index(index, records.len())?;
        let removed = records.remove(index);
        self.persist(&records)?;
        tracing::info!(kind = R::KIND, index, remaining = records.len(), "record deleted");
        Ok(removed)
    }

    fn persist(&self, records: &[R]) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(records).map_err(PersistError::from)?;
        self.sink.write_document(&bytes).map_err(|err| {
            tracing::error!(
                kind = R::KIND,
                document = %self.sink.describe(),
                error = %err,
                "collection write failed"
            );
            StoreError::from(err)
        })
    }
}
