//! Message and product record shapes, drafts, and the collection record trait.

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::types::AssetRef;

/// Keys of a stored record that its type does not model.
///
/// They are written back after the modelled fields on every rewrite, so
/// records carrying extra keys survive mutations of their neighbours.
pub type ExtraFields = Map<String, Value>;

/// Record type that can be stored in a [`crate::core::collection::JsonCollection`].
///
/// The JSON shape of the implementing type is the on-disk shape of one array
/// element in the backing document.
pub trait CollectionRecord:
    Serialize + DeserializeOwned + Clone + std::fmt::Debug + Send + Sync + 'static
{
    /// Short lowercase name used in logs, events and error messages.
    const KIND: &'static str;
}

/// A contact message left through the public form.
///
/// Stored messages are not validated beyond being JSON objects: a missing or
/// `null` text field loads as an empty string and a non-boolean `read` loads
/// by truthiness.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Sender name.
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    /// Sender email address.
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: String,
    /// Message body.
    #[serde(default, deserialize_with = "lenient_text")]
    pub message: String,
    /// ISO-8601 UTC submission time.
    #[serde(default, deserialize_with = "lenient_text")]
    pub timestamp: String,
    /// Whether the message has been marked read.
    #[serde(default, deserialize_with = "lenient_flag")]
    pub read: bool,
    /// Unmodelled keys, written back unchanged.
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl CollectionRecord for MessageRecord {
    const KIND: &'static str = "message";
}

/// Caller-supplied part of a [`MessageRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDraft {
    /// Sender name.
    pub name: String,
    /// Sender email address.
    pub email: String,
    /// Message body.
    pub message: String,
}

/// Product price, kept exactly as it was supplied.
///
/// Form submissions carry prices as strings while hand-edited documents often
/// hold plain numbers; both shapes round-trip unchanged. A missing or `null`
/// price loads as empty text, any other JSON value as its encoded text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Price {
    /// JSON number.
    Number(serde_json::Number),
    /// JSON string.
    Text(String),
}

impl Default for Price {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(n) => Self::Number(n),
            other => Self::Text(text_of(other)),
        })
    }
}

impl From<&str> for Price {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Price {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A product listing with its attached image references.
///
/// Loaded with the same leniency as [`MessageRecord`]; a missing or `null`
/// image list loads as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Display name.
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    /// Listed price.
    #[serde(default)]
    pub price: Price,
    /// Scripture reference or quote printed on the product.
    #[serde(default, deserialize_with = "lenient_text")]
    pub scripture: String,
    /// Category label.
    #[serde(default, deserialize_with = "lenient_text")]
    pub category: String,
    /// Asset references in upload order.
    #[serde(default, deserialize_with = "lenient_list")]
    pub images: Vec<AssetRef>,
    /// Unmodelled keys, written back unchanged.
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl CollectionRecord for ProductRecord {
    const KIND: &'static str = "product";
}

/// Product fields supplied by a create or update request, without images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFields {
    /// Display name.
    pub name: String,
    /// Listed price.
    pub price: Price,
    /// Scripture reference or quote.
    pub scripture: String,
    /// Category label.
    pub category: String,
}

impl ProductFields {
    /// Materializes a full record with the given image set.
    pub fn with_images(self, images: Vec<AssetRef>) -> ProductRecord {
        ProductRecord {
            name: self.name,
            price: self.price,
            scripture: self.scripture,
            category: self.category,
            images,
            extra: ExtraFields::new(),
        }
    }
}

fn text_of(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Value::deserialize(deserializer).map(text_of)
}

// Same truthiness a browser client applies to the stored flag.
fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

fn lenient_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => Vec::new(),
        Value::Array(items) => items.into_iter().map(text_of).collect(),
        other => vec![text_of(other)],
    })
}
