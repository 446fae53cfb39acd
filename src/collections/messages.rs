//! Contact message collection.

use chrono::{SecondsFormat, Utc};
use serde_json::Value;

use crate::{
    core::collection::{JsonCollection, StoreResult},
    persist::{file::FileDocument, DocumentSink},
    record::{ExtraFields, MessageDraft, MessageRecord},
    types::RecordIndex,
};

/// Append-only message inbox with a per-message read flag.
#[derive(Debug)]
pub struct MessageCollection<S = FileDocument> {
    records: JsonCollection<MessageRecord, S>,
}

impl<S: DocumentSink> MessageCollection<S> {
    /// Wraps the backing document.
    pub fn new(sink: S) -> Self {
        Self {
            records: JsonCollection::new(sink),
        }
    }

    /// Underlying generic collection.
    pub fn records(&self) -> &JsonCollection<MessageRecord, S> {
        &self.records
    }

    /// Stores a new unread message stamped with the current time.
    pub fn submit(&self, draft: MessageDraft) -> StoreResult<(RecordIndex, MessageRecord)> {
        let record = MessageRecord {
            name: draft.name,
            email: draft.email,
            message: draft.message,
            timestamp: now_iso8601(),
            read: false,
            extra: ExtraFields::new(),
        };
        self.records.append(record)
    }

    /// All messages in submission order.
    pub fn list(&self) -> StoreResult<Vec<MessageRecord>> {
        self.records.list()
    }

    /// Sets the read flag of the message at `index`.
    pub fn mark_read(&self, index: RecordIndex, read: bool) -> StoreResult<MessageRecord> {
        self.records.patch_field_at(index, "read", Value::Bool(read))
    }
}

fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
