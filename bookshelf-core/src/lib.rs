//! Record store abstraction behind the bookshelf catalog service.
//!
//! This crate provides:
//!
//! - **Records** ([`document`]) - Identifiers, schema-less records and BSON/JSON conversion
//! - **Acknowledgments** ([`ack`]) - Write summaries reported by backends
//! - **Store backend abstraction** ([`backend`]) - Traits for implementing storage backends
//! - **Query and filtering API** ([`query`]) - Backend-neutral filter expressions
//! - **Pagination** ([`page`]) - Page window math and page results
//! - **Collections interface** ([`collection`]) - Record operations on a named collection
//! - **Document store** ([`store`]) - Lazily connected, shareable store handle
//! - **Error handling** ([`error`]) - Error and result types
//!
//! # Example
//!
//! ```ignore
//! use bookshelf_core::{DocumentStore, Filter, Query};
//!
//! let store = DocumentStore::new(backend_builder);
//! let books = store.collection("books").await?;
//! let featured = books
//!     .query(Query::builder().filter(Filter::gt("rating", 4.5)).build())
//!     .await?;
//! ```

pub mod ack;
pub mod backend;
pub mod collection;
pub mod document;
pub mod error;
pub mod page;
pub mod query;
pub mod store;

pub use ack::{DeleteAck, InsertAck, UpdateAck};
pub use backend::{StoreBackend, StoreBackendBuilder};
pub use collection::Collection;
pub use document::{Fields, Record, RecordId};
pub use error::{StoreError, StoreResult};
pub use page::{Page, PaginationParams};
pub use query::{Expr, FieldOp, Filter, Query};
pub use store::DocumentStore;
