use axum::{
    extract::{rejection::JsonRejection, Multipart, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    core::indices::parse_index,
    record::{MessageDraft, MessageRecord, ProductRecord},
};

use super::{
    error::ApiError,
    form::{require, ProductForm},
    AppState,
};

/// Body of `POST /contact`.
#[derive(Debug, Deserialize)]
pub struct ContactBody {
    name: Option<String>,
    email: Option<String>,
    message: Option<String>,
}

/// Body of `PATCH /api/messages/:index/read`.
#[derive(Debug, Deserialize)]
pub struct ReadBody {
    read: bool,
}

/// Reply to a contact submission.
#[derive(Debug, Serialize)]
pub struct StatusReply {
    status: &'static str,
    message: &'static str,
}

/// Reply to index-addressed mutations.
#[derive(Debug, Serialize)]
pub struct SuccessReply {
    success: bool,
}

const OK: SuccessReply = SuccessReply { success: true };

/// `POST /contact`: stores a new unread message.
pub async fn submit_message(
    State(state): State<AppState>,
    body: Result<Json<ContactBody>, JsonRejection>,
) -> Result<Json<StatusReply>, ApiError> {
    let Json(body) = body.map_err(bad_json)?;
    let draft = MessageDraft {
        name: require(body.name, "name")?,
        email: require(body.email, "email")?,
        message: require(body.message, "message")?,
    };
    state.messages.submit(draft).await?;
    Ok(Json(StatusReply {
        status: "success",
        message: "Message saved",
    }))
}

/// `GET /api/messages`.
pub async fn list_messages(
    State(state): State<AppState>,
) -> Result<Json<Vec<MessageRecord>>, ApiError> {
    Ok(Json(state.messages.list().await?))
}

/// `PATCH /api/messages/:index/read`: sets the read flag.
pub async fn mark_read(
    State(state): State<AppState>,
    Path(index): Path<String>,
    body: Result<Json<ReadBody>, JsonRejection>,
) -> Result<Json<SuccessReply>, ApiError> {
    let index = parse_index(&index)?;
    let Json(body) = body.map_err(bad_json)?;
    state.messages.mark_read(index, body.read).await?;
    Ok(Json(OK))
}

/// `GET /products`.
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductRecord>>, ApiError> {
    Ok(Json(state.products.list().await?))
}

/// `POST /products`: saves uploaded images and appends the product.
pub async fn create_product(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ProductRecord>, ApiError> {
    let form = ProductForm::read(multipart).await?;
    let fields = form.product_fields()?;
    let record = state.products.create(fields, form.files).await?;
    Ok(Json(record))
}

/// `PUT /products/:index`: replaces the product, keeping its images when none are uploaded.
pub async fn update_product(
    State(state): State<AppState>,
    Path(index): Path<String>,
    multipart: Multipart,
) -> Result<Json<SuccessReply>, ApiError> {
    let index = parse_index(&index)?;
    let form = ProductForm::read(multipart).await?;
    let fields = form.product_fields()?;
    state.products.update(index, fields, form.files).await?;
    Ok(Json(OK))
}

/// `DELETE /products/:index`: removes the product; its image files stay on disk.
pub async fn delete_product(
    State(state): State<AppState>,
    Path(index): Path<String>,
) -> Result<Json<SuccessReply>, ApiError> {
    let index = parse_index(&index)?;
    state.products.delete(index).await?;
    Ok(Json(OK))
}

fn bad_json(err: JsonRejection) -> ApiError {
    ApiError::BadRequest(err.body_text())
}
