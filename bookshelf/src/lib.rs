//! # Bookshelf
//!
//! HTTP catalog service for book records.
//!
//! The service exposes list, search, featured, get, create, update and delete
//! operations under `/api/v1`, backed by any [`StoreBackend`](bookshelf_core::StoreBackend).
//! The store connects lazily on first use and is shared by every request.
//!
//! ```text
//! client ──▶ Router (CORS, trace) ──▶ handler ──▶ BookCatalog ──▶ DocumentStore ──▶ backend
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use bookshelf::{app, catalog::BookCatalog, handler::AppState};
//! use bookshelf_core::DocumentStore;
//! use bookshelf_memory::InMemoryStore;
//!
//! let store = DocumentStore::new(InMemoryStore::builder());
//! let router = app(Arc::new(AppState { catalog: BookCatalog::new(store, "books") }));
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod handler;
pub mod observability;

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use handler::{
    AppState,
    create_book,
    delete_book,
    get_book,
    health_check,
    list_books,
    list_featured_books,
    readiness_check,
    update_book,
};

/// Builds the service router.
///
/// Cross-origin requests are allowed from any origin, with credentials; the request
/// origin is mirrored back.
pub fn app(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/books", get(list_books).post(create_book))
        .route("/featuredbooks", get(list_featured_books))
        .route(
            "/books/{id}",
            get(get_book).put(update_book).delete(delete_book),
        );

    Router::new()
        .route("/health", get(health_check))
        .route("/health/ready", get(readiness_check))
        .nest("/api/v1", api)
        .with_state(state)
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
}
