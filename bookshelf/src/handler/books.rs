//! # Book handlers
//!
//! ```text
//! GET    /api/v1/books?page=&limit=&searchText=
//! GET    /api/v1/featuredbooks
//! GET    /api/v1/books/{id}
//! POST   /api/v1/books
//! PUT    /api/v1/books/{id}
//! DELETE /api/v1/books/{id}
//! ```

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    response::IntoResponse,
};
use bookshelf_core::{Fields, PaginationParams};
use serde::Deserialize;

use crate::{catalog::BookCatalog, error::ApiError};

/// Shared handler state
pub struct AppState {
    pub catalog: BookCatalog,
}

/// Query string of `GET /books`
///
/// Values are kept raw so that unparseable numbers fall back to defaults
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListBooksQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    #[serde(rename = "searchText")]
    pub search_text: Option<String>,
}

fn body(payload: Result<Json<Fields>, JsonRejection>) -> Result<Fields, ApiError> {
    payload
        .map(|Json(fields)| fields)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

#[tracing::instrument(skip_all)]
pub async fn list_books(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListBooksQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let params = PaginationParams::from_raw(query.page.as_deref(), query.limit.as_deref());
    let page = state
        .catalog
        .list(params, query.search_text.as_deref())
        .await?;

    Ok(Json(page))
}

#[tracing::instrument(skip_all)]
pub async fn list_featured_books(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.catalog.featured().await?))
}

#[tracing::instrument(skip_all, fields(%id))]
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.catalog.get(&id).await?))
}

#[tracing::instrument(skip_all)]
pub async fn create_book(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Fields>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let fields = body(payload)?;

    Ok(Json(state.catalog.create(fields).await?))
}

/// Merges the body into an existing book; absent fields are left untouched.
#[tracing::instrument(skip_all, fields(%id))]
pub async fn update_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<Fields>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let fields = body(payload)?;

    Ok(Json(state.catalog.update(&id, fields).await?))
}

#[tracing::instrument(skip_all, fields(%id))]
pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.catalog.delete(&id).await?))
}
