use crate::{core::collection::StoreError, types::RecordIndex};

/// Parses a path segment as a non-negative record index.
///
/// Signs, whitespace and trailing garbage are all rejected.
pub fn parse_index(raw: &str) -> Result<RecordIndex, StoreError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(StoreError::InvalidIndexFormat(raw.to_string()));
    }
    raw.parse::<RecordIndex>()
        .map_err(|_| StoreError::InvalidIndexFormat(raw.to_string()))
}

/// Checks `index` against the length of the freshly loaded sequence.
pub fn check_index(index: RecordIndex, len: usize) -> Result<(), StoreError> {
    if index < len {
        Ok(())
    } else {
        Err(StoreError::IndexOutOfRange { index, len })
    }
}
