//! # API errors
//!
//! Errors surfaced by the catalog handlers and their mapping to HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bookshelf_core::StoreError;
use serde::Serialize;
use thiserror::Error;

/// Client-facing error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// The targeted book does not exist
    #[error("Book not found")]
    NotFound,

    /// The path id is not a valid record id
    #[error("Invalid book id")]
    InvalidId,

    /// The request body could not be used
    #[error("{0}")]
    BadRequest(String),

    /// Storage or connectivity failure
    #[error("storage failure: {0}")]
    Store(StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::InvalidId | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DocumentNotFound(..) => ApiError::NotFound,
            StoreError::InvalidId(_) => ApiError::InvalidId,
            other => ApiError::Store(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match self {
            ApiError::Store(err) => {
                tracing::error!(error = %err, "request failed");
                (status, "Internal Server Error").into_response()
            }
            other => (status, Json(ErrorResponse { error: other.to_string() })).into_response(),
        }
    }
}
