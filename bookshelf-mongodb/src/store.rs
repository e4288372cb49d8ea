use async_trait::async_trait;
use bson::{Bson, Document, doc};
use futures::TryStreamExt;
use mongodb::{
    Client, Collection as MongoCollection,
    error::Error as MongoError,
    options::{ClientOptions, FindOptions},
};

use bookshelf_core::{
    ack::{DeleteAck, InsertAck, UpdateAck},
    backend::{StoreBackend, StoreBackendBuilder},
    document::{Fields, ID_FIELD, RecordId, fields_to_bson},
    error::{StoreError, StoreResult},
    query::Query,
};

use crate::query::MongoQueryTranslator;

fn backend_error(err: MongoError) -> StoreError {
    StoreError::Backend(err.to_string())
}

/// Window options for a find.
///
/// Oversized windows saturate; a negative limit would ask the server for a single batch.
fn find_options(query: &Query) -> FindOptions {
    let mut options = FindOptions::default();
    options.limit = query
        .limit
        .map(|limit| i64::try_from(limit).unwrap_or(i64::MAX));
    options.skip = query
        .offset
        .map(|skip| u64::try_from(skip).unwrap_or(u64::MAX));

    options
}

#[derive(Debug, Clone)]
pub struct MongoDbStore {
    client: Client,
    database: String,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(dsn, database)
    }

    fn get_collection(&self, collection_name: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(collection_name)
    }

    fn by_id(id: &RecordId) -> Document {
        doc! { ID_FIELD: *id }
    }
}

#[async_trait]
impl StoreBackend for MongoDbStore {
    async fn insert_document(&self, fields: Fields, collection: &str) -> StoreResult<InsertAck> {
        let id = RecordId::new();
        let mut document = Self::by_id(&id);
        for (key, value) in fields_to_bson(&fields)? {
            document.insert(key, value);
        }

        self.get_collection(collection)
            .insert_one(document)
            .await
            .map_err(backend_error)?;

        Ok(InsertAck::new(id))
    }

    async fn update_document(&self, id: RecordId, fields: Fields, collection: &str) -> StoreResult<UpdateAck> {
        let changes = fields_to_bson(&fields)?;
        let collection = self.get_collection(collection);

        // An empty `$set` is rejected by the server; report the match without writing.
        if changes.is_empty() {
            let matched = collection
                .count_documents(Self::by_id(&id))
                .await
                .map_err(backend_error)?;

            return Ok(UpdateAck::new(matched, 0));
        }

        let result = collection
            .update_one(Self::by_id(&id), doc! { "$set": changes })
            .await
            .map_err(backend_error)?;

        Ok(UpdateAck::new(result.matched_count, result.modified_count))
    }

    async fn delete_document(&self, id: RecordId, collection: &str) -> StoreResult<DeleteAck> {
        let result = self
            .get_collection(collection)
            .delete_one(Self::by_id(&id))
            .await
            .map_err(backend_error)?;

        Ok(DeleteAck::new(result.deleted_count))
    }

    async fn get_documents(&self, ids: Vec<RecordId>, collection: &str) -> StoreResult<Vec<Document>> {
        let ids = ids
            .into_iter()
            .map(Bson::from)
            .collect::<Vec<_>>();

        self.get_collection(collection)
            .find(doc! { ID_FIELD: { "$in": ids } })
            .await
            .map_err(backend_error)?
            .try_collect::<Vec<Document>>()
            .await
            .map_err(backend_error)
    }

    async fn query_documents(&self, query: Query, collection: &str) -> StoreResult<Vec<Document>> {
        let options = find_options(&query);

        let filter = match &query.filter {
            Some(expr) => MongoQueryTranslator::translate(expr)?,
            None => doc! {},
        };

        self.get_collection(collection)
            .find(filter)
            .with_options(options)
            .await
            .map_err(backend_error)?
            .try_collect::<Vec<Document>>()
            .await
            .map_err(backend_error)
    }

    async fn count_documents(&self, collection: &str) -> StoreResult<u64> {
        self.get_collection(collection)
            .count_documents(doc! {})
            .await
            .map_err(backend_error)
    }

    async fn ping(&self) -> StoreResult<()> {
        self.client
            .database(&self.database)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(backend_error)?;

        Ok(())
    }

    async fn shutdown(&self) -> StoreResult<()> {
        self.client.clone().shutdown().await;

        Ok(())
    }
}

/// Connects a [`MongoDbStore`] from a connection string.
///
/// Parsing the connection string happens in [`build`](StoreBackendBuilder::build), so an
/// empty or malformed string only fails once the store is first used.
#[derive(Debug, Clone)]
pub struct MongoDbStoreBuilder {
    dsn: String,
    database: String,
}

impl MongoDbStoreBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
        }
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    async fn build(&self) -> StoreResult<Self::Backend> {
        Ok(MongoDbStore::new(
            Client::with_options(
                ClientOptions::parse(&self.dsn)
                    .await
                    .map_err(|e| StoreError::Initialization(e.to_string()))?,
            )
            .map_err(|e| StoreError::Initialization(e.to_string()))?,
            self.database.clone(),
        ))
    }
}
