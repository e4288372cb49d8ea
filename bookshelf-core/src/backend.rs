//! Storage backend abstraction for the record store.
//!
//! This module defines the traits that abstract over storage implementations so the catalog
//! can run against MongoDB in production and an in-memory map in tests.
//!
//! # Traits
//!
//! - [`StoreBackend`]: The core trait for storage backends
//! - [`StoreBackendBuilder`]: Factory trait for connecting a backend
//! - [`DynStoreBackendBuilder`]: Object-safe form of the builder, used by the lazy store
//!
//! # Examples
//!
//! ```ignore
//! use bookshelf_core::backend::StoreBackend;
//! use bookshelf_core::document::Fields;
//!
//! let backend = MyBackendImpl::new();
//!
//! let mut fields = Fields::new();
//! fields.insert("title".into(), "Dune".into());
//! let ack = backend.insert_document(fields, "books").await?;
//! println!("stored as {}", ack.inserted_id);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use async_trait::async_trait;
use bson::Document as BsonDocument;
use std::{fmt::Debug, sync::Arc};

use crate::{
    ack::{DeleteAck, InsertAck, UpdateAck},
    document::{Fields, RecordId},
    error::StoreResult,
    query::Query,
};

/// Abstract interface for record storage backends.
///
/// Every operation addresses a single named collection. Documents handed back by
/// [`get_documents`](StoreBackend::get_documents) and
/// [`query_documents`](StoreBackend::query_documents) always carry their `_id`.
///
/// # Thread Safety
///
/// Implementations must be thread-safe; one backend instance serves every request
/// handled by the process.
///
/// # Error Handling
///
/// Operations return [`StoreResult<T>`](crate::error::StoreResult). A missing record is
/// never an error at this level: acknowledgments report zero counts instead, and
/// [`Collection`](crate::collection::Collection) decides what that means.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Inserts a new record and assigns it a fresh identifier.
    ///
    /// # Arguments
    ///
    /// * `fields` - The record's fields. Any `_id` key is ignored.
    /// * `collection` - The collection to insert into. Created on first use.
    ///
    /// # Returns
    ///
    /// The [`InsertAck`] carrying the assigned identifier.
    async fn insert_document(&self, fields: Fields, collection: &str) -> StoreResult<InsertAck>;

    /// Merges `fields` into the record with the given id.
    ///
    /// Fields not mentioned are left untouched. No record is created when the id is
    /// unknown; the acknowledgment simply reports `matched_count == 0`.
    ///
    /// # Arguments
    ///
    /// * `id` - Identifier of the record to update
    /// * `fields` - Fields to set. Any `_id` key is ignored.
    /// * `collection` - The collection containing the record
    async fn update_document(
        &self,
        id: RecordId,
        fields: Fields,
        collection: &str,
    ) -> StoreResult<UpdateAck>;

    /// Removes the record with the given id, if any.
    ///
    /// # Arguments
    ///
    /// * `id` - Identifier of the record to delete
    /// * `collection` - The collection to delete from
    async fn delete_document(&self, id: RecordId, collection: &str) -> StoreResult<DeleteAck>;

    /// Retrieves records by identifier.
    ///
    /// Unknown ids are omitted. Results follow the store's natural order, not the
    /// order of `ids`.
    async fn get_documents(
        &self,
        ids: Vec<RecordId>,
        collection: &str,
    ) -> StoreResult<Vec<BsonDocument>>;

    /// Returns the records matching `query`, in natural order, windowed by its
    /// offset and limit.
    ///
    /// # See Also
    ///
    /// - [`crate::query::Filter`] for building filter expressions
    async fn query_documents(
        &self,
        query: Query,
        collection: &str,
    ) -> StoreResult<Vec<BsonDocument>>;

    /// Counts every record in the collection, ignoring any filter.
    async fn count_documents(&self, collection: &str) -> StoreResult<u64>;

    /// Checks that the backend is reachable.
    async fn ping(&self) -> StoreResult<()>;

    /// Releases any resources held by the backend.
    ///
    /// The default implementation is a no-op; backends holding external connections
    /// should override it.
    async fn shutdown(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[async_trait]
impl<B> StoreBackend for Arc<B>
where
    B: StoreBackend + ?Sized,
{
    async fn insert_document(&self, fields: Fields, collection: &str) -> StoreResult<InsertAck> {
        (**self)
            .insert_document(fields, collection)
            .await
    }

    async fn update_document(
        &self,
        id: RecordId,
        fields: Fields,
        collection: &str,
    ) -> StoreResult<UpdateAck> {
        (**self)
            .update_document(id, fields, collection)
            .await
    }

    async fn delete_document(&self, id: RecordId, collection: &str) -> StoreResult<DeleteAck> {
        (**self)
            .delete_document(id, collection)
            .await
    }

    async fn get_documents(
        &self,
        ids: Vec<RecordId>,
        collection: &str,
    ) -> StoreResult<Vec<BsonDocument>> {
        (**self)
            .get_documents(ids, collection)
            .await
    }

    async fn query_documents(
        &self,
        query: Query,
        collection: &str,
    ) -> StoreResult<Vec<BsonDocument>> {
        (**self)
            .query_documents(query, collection)
            .await
    }

    async fn count_documents(&self, collection: &str) -> StoreResult<u64> {
        (**self).count_documents(collection).await
    }

    async fn ping(&self) -> StoreResult<()> {
        (**self).ping().await
    }

    async fn shutdown(&self) -> StoreResult<()> {
        (**self).shutdown().await
    }
}

/// Connects a backend.
///
/// Builders are reusable: the lazy [`DocumentStore`](crate::store::DocumentStore) calls
/// [`build`](StoreBackendBuilder::build) again after a failed attempt.
#[async_trait]
pub trait StoreBackendBuilder: Send + Sync + Debug {
    type Backend: StoreBackend;

    async fn build(&self) -> StoreResult<Self::Backend>;
}

/// Object-safe counterpart of [`StoreBackendBuilder`] that erases the backend type.
#[async_trait]
pub trait DynStoreBackendBuilder: Send + Sync + Debug {
    async fn build_dyn(&self) -> StoreResult<Arc<dyn StoreBackend>>;
}

#[async_trait]
impl<B> DynStoreBackendBuilder for B
where
    B: StoreBackendBuilder,
    B::Backend: 'static,
{
    async fn build_dyn(&self) -> StoreResult<Arc<dyn StoreBackend>> {
        let backend = self.build().await?;

        Ok(Arc::new(backend))
    }
}
