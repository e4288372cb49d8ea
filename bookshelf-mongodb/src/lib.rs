//! MongoDB backend implementation for bookshelf.
//!
//! This crate provides a MongoDB-based implementation of the `StoreBackend` trait on top of
//! the official async driver. The service enables it through its default `mongodb` feature.
//!
//! # Features
//!
//! - **Persistent storage** - Records live in MongoDB Atlas or a self-hosted server
//! - **Native querying** - Filters are translated to MongoDB query documents
//! - **Driver acknowledgments** - Write counts come straight from the server
//!
//! # Connection
//!
//! The builder takes a connection string and a database name. Nothing is parsed or
//! dialled until the builder runs.
//!
//! # Example
//!
//! ```ignore
//! use bookshelf_core::DocumentStore;
//! use bookshelf_mongodb::MongoDbStore;
//!
//! let store = DocumentStore::new(MongoDbStore::builder("mongodb://localhost:27017", "sample_books"));
//! store.ping().await?;
//! ```

pub mod query;
pub mod store;

pub use store::{MongoDbStore, MongoDbStoreBuilder};
