//! Shared primitive aliases and upload payloads.

/// Zero-based position of a record within its collection.
pub type RecordIndex = usize;

/// Relative path of a stored asset, e.g. `images/1700000000000-cover.png`.
pub type AssetRef = String;

/// Flat mapping of decoded request body fields.
pub type FormFields = hashbrown::HashMap<String, String>;

/// One uploaded file as received from the request layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// File name supplied by the client.
    pub original_name: String,
    /// Raw file content.
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Builds an upload from a name and its content.
    pub fn new(original_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            original_name: original_name.into(),
            bytes: bytes.into(),
        }
    }
}
