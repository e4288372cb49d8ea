//! # HTTP handlers
//!
//! Handler functions for the catalog routes. Each handler lives in a submodule and is
//! re-exported here. Handlers stay thin and delegate to [`BookCatalog`](crate::catalog::BookCatalog).

pub mod books;
pub mod health;

pub use books::{
    AppState,
    ListBooksQuery,
    create_book,
    delete_book,
    get_book,
    list_books,
    list_featured_books,
    update_book,
};
pub use health::{health_check, readiness_check};
