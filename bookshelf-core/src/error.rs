//! Error types and result types for document store operations.
//!
//! Every storage-access function returns a [`StoreResult<T>`]. Callers decide how each
//! variant is surfaced; the HTTP layer maps them to status codes through a single table.

use bson::error::Error as BsonError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors that can occur when interacting with a document store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Serialization/deserialization error when converting between document formats (BSON, JSON).
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Error during store initialization or connection setup.
    #[error("Initialization error: {0}")]
    Initialization(String),
    /// The supplied identifier is not a well-formed record id.
    #[error("Invalid identifier: {0}")]
    InvalidId(String),
    /// No document matched the given ID in the collection.
    /// The first argument is the document ID, the second is the collection name.
    #[error("Document {0} not found in collection {1}")]
    DocumentNotFound(String, String),
    /// The supplied document is not something the store can hold (e.g. not an object).
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    /// An error occurred in the underlying storage backend.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// A specialized `Result` type for document store operations.
pub type StoreResult<T> = Result<T, StoreError>;

impl From<BsonError> for StoreError {
    fn from(err: BsonError) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

impl From<SerdeJsonError> for StoreError {
    fn from(err: SerdeJsonError) -> Self {
        StoreError::Serialization(err.to_string())
    }
}
