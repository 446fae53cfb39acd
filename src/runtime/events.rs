//! Runtime event stream payloads.

use crate::types::RecordIndex;

/// Events emitted after a mutation has been written to the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionEvent {
    /// A record was appended.
    Appended {
        /// Collection kind, e.g. `"message"`.
        kind: &'static str,
        /// Index of the new record.
        index: RecordIndex,
    },
    /// A record was replaced in full.
    Replaced {
        /// Collection kind.
        kind: &'static str,
        /// Replaced index.
        index: RecordIndex,
    },
    /// One field of a record was patched.
    Patched {
        /// Collection kind.
        kind: &'static str,
        /// Patched index.
        index: RecordIndex,
        /// Patched field name.
        field: &'static str,
    },
    /// A record was removed; later indices shifted down by one.
    Deleted {
        /// Collection kind.
        kind: &'static str,
        /// Removed index.
        index: RecordIndex,
    },
}
