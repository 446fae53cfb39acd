//! Request body decoding: multipart product forms and required fields.

use axum::extract::Multipart;

use crate::{
    record::{Price, ProductFields},
    types::{FormFields, UploadedFile},
};

use super::error::ApiError;

/// Multipart field name carrying product images.
pub const IMAGES_FIELD: &str = "images";

/// Decoded product form: text fields plus image uploads in submission order.
#[derive(Debug, Default)]
pub struct ProductForm {
    /// Text fields by name; a repeated name keeps the last value.
    pub fields: FormFields,
    /// Files sent under [`IMAGES_FIELD`].
    pub files: Vec<UploadedFile>,
}

impl ProductForm {
    /// Drains a multipart body.
    ///
    /// Empty file parts (a file input left blank) are skipped. Files under any
    /// field other than [`IMAGES_FIELD`] are rejected.
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().map(str::to_string);
            match file_name {
                Some(original_name) => {
                    if name != IMAGES_FIELD {
                        return Err(ApiError::BadRequest(format!(
                            "unexpected file field: {name}"
                        )));
                    }
                    let bytes = field.bytes().await.map_err(bad_multipart)?;
                    if original_name.is_empty() && bytes.is_empty() {
                        continue;
                    }
                    form.files.push(UploadedFile::new(original_name, bytes.to_vec()));
                }
                None => {
                    let value = field.text().await.map_err(bad_multipart)?;
                    form.fields.insert(name, value);
                }
            }
        }
        tracing::debug!(
            fields = form.fields.len(),
            files = form.files.len(),
            "product form decoded"
        );
        Ok(form)
    }

    /// Extracts the product fields, all of which are required.
    pub fn product_fields(&self) -> Result<ProductFields, ApiError> {
        Ok(ProductFields {
            name: required(&self.fields, "name")?,
            price: Price::from(required(&self.fields, "price")?),
            scripture: required(&self.fields, "scripture")?,
            category: required(&self.fields, "category")?,
        })
    }
}

/// Returns the named field, failing when it is absent or blank.
pub fn required(fields: &FormFields, name: &'static str) -> Result<String, ApiError> {
    require(fields.get(name).cloned(), name)
}

/// Presence check for an optional decoded value.
pub fn require(value: Option<String>, name: &'static str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::MissingField(name)),
    }
}

fn bad_multipart(err: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::BadRequest(format!("malformed multipart body: {err}"))
}
