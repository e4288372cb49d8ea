//! In-memory record storage backend for bookshelf.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend` trait.
//! It is used by the service's tests and for running the catalog locally without a database.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes using an async-aware RwLock
//! - **Natural order** - Records come back in insertion order, like an unsorted MongoDB scan
//! - **Full filter support** - Evaluates every query operator, including case-insensitive contains
//!
//! # Quick Start
//!
//! ```ignore
//! use bookshelf_core::DocumentStore;
//! use bookshelf_memory::InMemoryStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = DocumentStore::new(InMemoryStore::builder());
//!     let books = store.collection("books").await?;
//!
//!     let mut fields = bookshelf_core::Fields::new();
//!     fields.insert("title".into(), "Dune".into());
//!     books.insert(fields).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod evaluator;
pub mod store;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
