//! Product listing collection with image attachments.

use crate::{
    core::collection::{JsonCollection, StoreError, StoreResult},
    persist::{assets::AssetStore, file::FileDocument, DocumentSink},
    record::{ProductFields, ProductRecord},
    types::{RecordIndex, UploadedFile},
};

/// Product listings whose images are stored through an [`AssetStore`].
#[derive(Debug)]
pub struct ProductCollection<S = FileDocument> {
    records: JsonCollection<ProductRecord, S>,
    assets: AssetStore,
}

impl<S: DocumentSink> ProductCollection<S> {
    /// Wraps the backing document and the asset directory.
    pub fn new(sink: S, assets: AssetStore) -> Self {
        Self {
            records: JsonCollection::new(sink),
            assets,
        }
    }

    /// Underlying generic collection.
    pub fn records(&self) -> &JsonCollection<ProductRecord, S> {
        &self.records
    }

    /// Asset storage used for uploads.
    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    /// Saves `files` and appends a product referencing them in upload order.
    pub fn create(
        &self,
        fields: ProductFields,
        files: &[UploadedFile],
    ) -> StoreResult<(RecordIndex, ProductRecord)> {
        let images = self.assets.save_many(files)?;
        self.records.append(fields.with_images(images))
    }

    /// All products in order.
    pub fn list(&self) -> StoreResult<Vec<ProductRecord>> {
        self.records.list()
    }

    /// Replaces the product at `index`.
    ///
    /// New files replace the whole image set. Without files the current
    /// images are carried over unchanged. Files are only written once the
    /// index is known to be valid.
    pub fn update(
        &self,
        index: RecordIndex,
        fields: ProductFields,
        files: &[UploadedFile],
    ) -> StoreResult<ProductRecord> {
        self.records.replace_with(index, |current| {
            let images = if files.is_empty() {
                current.images.clone()
            } else {
                self.assets.save_many(files).map_err(StoreError::from)?
            };
            Ok(fields.with_images(images))
        })
    }

    /// Removes the product at `index`. Its image files stay on disk.
    pub fn delete(&self, index: RecordIndex) -> StoreResult<ProductRecord> {
        self.records.delete_at(index)
    }
}
