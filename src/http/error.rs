use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::{core::collection::StoreError, runtime::handle::RuntimeError};

/// Request failure rendered as `{"error": "..."}` with a matching status.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Failure reported by a collection worker.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    /// Failure raised before reaching a worker, e.g. a malformed index.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// A required body field was absent or empty.
    #[error("missing field: {0}")]
    MissingField(&'static str),
    /// The body could not be decoded.
    #[error("bad request: {0}")]
    BadRequest(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    /// HTTP status for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Runtime(RuntimeError::Store(err)) | Self::Store(err) => store_status(err),
            Self::Runtime(RuntimeError::ChannelClosed) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::MissingField(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    // Client-facing text; never carries paths or I/O details.
    fn public_message(&self) -> String {
        match self {
            Self::Runtime(RuntimeError::Store(err)) | Self::Store(err) => store_message(err),
            Self::Runtime(RuntimeError::ChannelClosed) => "internal error".to_string(),
            Self::MissingField(field) => format!("missing field: {field}"),
            Self::BadRequest(reason) => reason.clone(),
        }
    }
}

fn store_status(err: &StoreError) -> StatusCode {
    if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

fn store_message(err: &StoreError) -> String {
    match err {
        StoreError::IndexOutOfRange { .. } | StoreError::InvalidIndexFormat(_) => {
            "invalid index".to_string()
        }
        StoreError::UnknownField(field) => format!("unknown field: {field}"),
        StoreError::InvalidFieldValue { field, .. } => format!("invalid value for field: {field}"),
        StoreError::CorruptDocument { .. } => "stored collection is unreadable".to_string(),
        StoreError::Persistence(_) => "failed to save changes".to_string(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, %status, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }
        let body = ErrorBody {
            error: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}

/// Failure to start the HTTP service.
#[derive(Debug, Error)]
pub enum ServeError {
    /// Opening the collections failed.
    #[error("failed to open collections: {0}")]
    Store(#[from] StoreError),
    /// Binding or serving failed.
    #[error("server io error: {0}")]
    Io(#[from] std::io::Error),
}
