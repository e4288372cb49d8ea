//! In-memory storage implementation for record stores.
//!
//! Collections are vectors of BSON documents behind an async-aware read-write lock.
//! Vector order is insertion order, which serves as the store's natural order.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use bson::{Bson, Document as BsonDocument};
use mea::rwlock::RwLock;

use bookshelf_core::{
    ack::{DeleteAck, InsertAck, UpdateAck},
    backend::{StoreBackend, StoreBackendBuilder},
    document::{Fields, ID_FIELD, RecordId, fields_to_bson},
    error::StoreResult,
    query::Query,
};

use crate::evaluator::DocumentEvaluator;

type StoreMap = HashMap<String, Vec<BsonDocument>>;

fn has_id(document: &BsonDocument, id: &RecordId) -> bool {
    matches!(document.get(ID_FIELD), Some(Bson::ObjectId(oid)) if oid == id.as_object_id())
}

/// Thread-safe in-memory record storage backend.
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state, so clones
/// share the same underlying data.
///
/// Queries scan the whole collection; there is no indexing.
///
/// # Example
///
/// ```ignore
/// use bookshelf_memory::InMemoryStore;
/// use bookshelf_core::backend::StoreBackend;
///
/// let store = InMemoryStore::new();
/// let ack = store.insert_document(fields, "books").await?;
/// let docs = store.get_documents(vec![ack.inserted_id], "books").await?;
/// assert_eq!(docs.len(), 1);
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// collection_name -> documents in insertion order
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self { store: Arc::new(RwLock::new(StoreMap::new())) }
    }

    /// Creates a builder for constructing an `InMemoryStore`.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }
}

#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn insert_document(&self, fields: Fields, collection: &str) -> StoreResult<InsertAck> {
        let body = fields_to_bson(&fields)?;
        let id = RecordId::new();

        let mut document = BsonDocument::new();
        document.insert(ID_FIELD, id);
        for (key, value) in body {
            document.insert(key, value);
        }

        self.store
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(document);

        Ok(InsertAck::new(id))
    }

    async fn update_document(&self, id: RecordId, fields: Fields, collection: &str) -> StoreResult<UpdateAck> {
        let body = fields_to_bson(&fields)?;

        let mut store = self.store.write().await;
        let Some(document) = store
            .get_mut(collection)
            .and_then(|documents| documents.iter_mut().find(|doc| has_id(doc, &id)))
        else {
            return Ok(UpdateAck::new(0, 0));
        };

        let before = document.clone();
        for (key, value) in body {
            document.insert(key, value);
        }

        let modified = if *document == before { 0 } else { 1 };

        Ok(UpdateAck::new(1, modified))
    }

    async fn delete_document(&self, id: RecordId, collection: &str) -> StoreResult<DeleteAck> {
        let mut store = self.store.write().await;
        let Some(documents) = store.get_mut(collection) else {
            return Ok(DeleteAck::new(0));
        };

        match documents.iter().position(|doc| has_id(doc, &id)) {
            Some(index) => {
                documents.remove(index);
                Ok(DeleteAck::new(1))
            }
            None => Ok(DeleteAck::new(0)),
        }
    }

    async fn get_documents(&self, ids: Vec<RecordId>, collection: &str) -> StoreResult<Vec<BsonDocument>> {
        let store = self.store.read().await;
        let documents = match store.get(collection) {
            Some(documents) => documents,
            None => return Ok(vec![]),
        };

        Ok(
            documents
                .iter()
                .filter(|doc| ids.iter().any(|id| has_id(doc, id)))
                .cloned()
                .collect()
        )
    }

    async fn query_documents(&self, query: Query, collection: &str) -> StoreResult<Vec<BsonDocument>> {
        let store = self.store.read().await;
        let documents = match store.get(collection) {
            Some(documents) => documents,
            None => return Ok(vec![]),
        };

        let filtered = match &query.filter {
            Some(filter) => DocumentEvaluator::filter_documents(documents, filter)?,
            None => documents.clone(),
        };

        Ok(
            filtered
                .into_iter()
                .skip(query.offset.unwrap_or(0))
                .take(query.limit.unwrap_or(usize::MAX))
                .collect()
        )
    }

    async fn count_documents(&self, collection: &str) -> StoreResult<u64> {
        Ok(
            self.store
                .read()
                .await
                .get(collection)
                .map_or(0, |documents| documents.len() as u64)
        )
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

/// Builder for constructing [`InMemoryStore`] instances.
///
/// # Example
///
/// ```ignore
/// use bookshelf_memory::InMemoryStore;
/// use bookshelf_core::store::DocumentStore;
///
/// let store = DocumentStore::new(InMemoryStore::builder());
/// ```
#[derive(Default, Debug)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    /// Always succeeds with a freshly initialized store.
    async fn build(&self) -> StoreResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}
