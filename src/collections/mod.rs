//! Message and product specializations of the collection engine.

/// Contact messages.
pub mod messages;
/// Product listings.
pub mod products;

use crate::{
    config::StoreConfig,
    core::collection::StoreResult,
    persist::{assets::AssetStore, file::FileDocument},
};

pub use messages::MessageCollection;
pub use products::ProductCollection;

/// Both file-backed collections of one data directory.
#[derive(Debug)]
pub struct Collections {
    /// Contact messages.
    pub messages: MessageCollection,
    /// Product listings.
    pub products: ProductCollection,
}

impl Collections {
    /// Opens the collections described by `config`, creating empty documents
    /// and the image directory on first run.
    pub fn open(config: &StoreConfig) -> StoreResult<Self> {
        let messages = MessageCollection::new(FileDocument::new(config.messages_path()));
        let assets = AssetStore::with_prefix(config.images_path(), config.asset_prefix.clone());
        let products = ProductCollection::new(FileDocument::new(config.products_path()), assets);

        messages.records().initialize()?;
        products.records().initialize()?;
        if products.assets().initialize()? {
            tracing::info!(dir = %config.images_path().display(), "created image directory");
        }

        Ok(Self { messages, products })
    }
}
