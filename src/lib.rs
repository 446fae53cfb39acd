//! Flat-file JSON record store for contact messages and product listings.
//!
//! Each collection is one JSON array document on disk, addressed by position.
//! Every operation reloads the document, so indices are always checked
//! against current contents, and every mutation rewrites the whole array.
//! Product images are written to an asset directory and referenced from the
//! records as `images/<millis>-<name>`.
//!
//! # Examples
//!
//! Direct, synchronous use of the collections:
//! ```
//! use shelfstore::{
//!     collections::Collections,
//!     config::StoreConfig,
//!     record::{MessageDraft, Price, ProductFields},
//!     types::UploadedFile,
//! };
//!
//! let dir = tempfile::tempdir().expect("tempdir");
//! let store = Collections::open(&StoreConfig::in_dir(dir.path())).expect("open");
//!
//! store.messages.submit(MessageDraft {
//!     name: "A".to_string(),
//!     email: "a@x.com".to_string(),
//!     message: "hi".to_string(),
//! }).expect("submit");
//! store.messages.mark_read(0, true).expect("mark read");
//! assert!(store.messages.list().expect("list")[0].read);
//!
//! let (_, product) = store.products.create(
//!     ProductFields {
//!         name: "Mug".to_string(),
//!         price: Price::from("12.00"),
//!         scripture: "Ps 23:1".to_string(),
//!         category: "home".to_string(),
//!     },
//!     &[UploadedFile::new("mug.png", b"png".to_vec())],
//! ).expect("create");
//! assert_eq!(product.images.len(), 1);
//! ```
//!
//! Serialized access through per-collection workers:
//! ```no_run
//! use shelfstore::{
//!     collections::Collections,
//!     config::StoreConfig,
//!     record::MessageDraft,
//!     runtime::handle::{spawn_collection, RuntimeConfig},
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let store = Collections::open(&StoreConfig::in_dir("data")).expect("open");
//! let messages = spawn_collection(store.messages, RuntimeConfig::default());
//! messages.submit(MessageDraft {
//!     name: "A".to_string(),
//!     email: "a@x.com".to_string(),
//!     message: "hi".to_string(),
//! }).await.expect("submit");
//! messages.shutdown().await.expect("shutdown");
//! # }
//! ```
#![deny(missing_docs)]

/// Message and product collections.
pub mod collections;
/// Storage and server configuration.
pub mod config;
/// Generic collection engine and index helpers.
pub mod core;
/// HTTP request layer.
pub mod http;
/// Document and asset persistence.
pub mod persist;
/// Record shapes.
pub mod record;
/// Single-writer runtime handle and events.
pub mod runtime;
/// Shared primitive types.
pub mod types;
