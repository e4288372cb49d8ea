//! Collection handle for record operations.
//!
//! A [`Collection`] pairs a connected backend with a collection name and turns the
//! backend's raw documents and acknowledgments into [`Record`]s and errors.
//!
//! # Example
//!
//! ```ignore
//! use bookshelf_core::query::{Filter, Query};
//!
//! let books = store.collection("books").await?;
//! let ack = books.insert(fields).await?;
//! let featured = books
//!     .query(Query::builder().filter(Filter::gt("rating", 4.5)).build())
//!     .await?;
//! ```

use std::sync::Arc;

use crate::{
    ack::{DeleteAck, InsertAck, UpdateAck},
    backend::StoreBackend,
    document::{Fields, Record, RecordId},
    error::{StoreError, StoreResult},
    query::Query,
};

/// A named collection on a connected backend.
#[derive(Debug, Clone)]
pub struct Collection {
    name: String,
    backend: Arc<dyn StoreBackend>,
}

impl Collection {
    pub(crate) fn new(name: String, backend: Arc<dyn StoreBackend>) -> Self {
        Self { name, backend }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inserts a new record with a store-assigned identifier.
    ///
    /// # Arguments
    ///
    /// * `fields` - The record's fields. A client supplied `_id` is ignored.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backend rejects the document.
    pub async fn insert(&self, fields: Fields) -> StoreResult<InsertAck> {
        self.backend
            .insert_document(fields, &self.name)
            .await
    }

    /// Merges `fields` into an existing record.
    ///
    /// # Arguments
    ///
    /// * `id` - Identifier of the record to update
    /// * `fields` - Fields to set; all others are left untouched
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DocumentNotFound`] if no record has the given id.
    pub async fn update(&self, id: RecordId, fields: Fields) -> StoreResult<UpdateAck> {
        let ack = self
            .backend
            .update_document(id, fields, &self.name)
            .await?;

        if ack.matched_count == 0 {
            return Err(self.not_found(id));
        }
        Ok(ack)
    }

    /// Deletes a record by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DocumentNotFound`] if no record has the given id.
    pub async fn delete(&self, id: RecordId) -> StoreResult<DeleteAck> {
        let ack = self
            .backend
            .delete_document(id, &self.name)
            .await?;

        if ack.deleted_count == 0 {
            return Err(self.not_found(id));
        }
        Ok(ack)
    }

    /// Retrieves records by id. Unknown ids are omitted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidDocument`] if a stored document has no `_id`.
    pub async fn get(&self, ids: Vec<RecordId>) -> StoreResult<Vec<Record>> {
        self.backend
            .get_documents(ids, &self.name)
            .await?
            .into_iter()
            .map(Record::from_bson)
            .collect()
    }

    /// Returns the records matching `query` in natural order.
    pub async fn query(&self, query: Query) -> StoreResult<Vec<Record>> {
        self.backend
            .query_documents(query, &self.name)
            .await?
            .into_iter()
            .map(Record::from_bson)
            .collect()
    }

    /// Counts every record in the collection.
    pub async fn count(&self) -> StoreResult<u64> {
        self.backend
            .count_documents(&self.name)
            .await
    }

    fn not_found(&self, id: RecordId) -> StoreError {
        StoreError::DocumentNotFound(id.to_string(), self.name.clone())
    }
}
