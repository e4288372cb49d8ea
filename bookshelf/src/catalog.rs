//! # Book catalog
//!
//! The catalog operations behind the HTTP handlers: paging, search, featured books and
//! single-record CRUD against one collection.

use bookshelf_core::{
    Collection, DeleteAck, DocumentStore, Expr, Fields, Filter, InsertAck, Page,
    PaginationParams, Query, Record, RecordId, StoreResult, UpdateAck,
    document::fields_to_bson,
};

use crate::error::ApiError;

/// Fields searched by free-text search.
pub const SEARCH_FIELDS: [&str; 3] = ["title", "author", "narrator"];

/// Books rated strictly above this are featured.
pub const FEATURED_RATING: f64 = 4.5;

/// Case-insensitive substring match on any of [`SEARCH_FIELDS`].
pub fn search_filter(text: &str) -> Expr {
    Filter::or(
        SEARCH_FIELDS
            .into_iter()
            .map(|field| Filter::contains(field, text)),
    )
}

#[derive(Debug, Clone)]
pub struct BookCatalog {
    store: DocumentStore,
    collection: String,
}

impl BookCatalog {
    pub fn new(store: DocumentStore, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    async fn books(&self) -> Result<Collection, ApiError> {
        Ok(self.store.collection(&self.collection).await?)
    }

    /// Lists one page of books, or every match when `search` is non-empty.
    ///
    /// Searching ignores the window. `totalPages` always comes from the unfiltered
    /// count, so it describes the paged listing even for search results.
    pub async fn list(&self, params: PaginationParams, search: Option<&str>) -> Result<Page<Record>, ApiError> {
        let books = self.books().await?;

        let query = match search.filter(|text| !text.is_empty()) {
            Some(text) => {
                tracing::debug!(search = text, "searching books");
                Query::builder().filter(search_filter(text)).build()
            }
            None => Query::builder()
                .offset(params.offset())
                .limit(params.per_page)
                .build(),
        };

        let items = books.query(query).await?;
        let count = books.count().await?;

        Ok(Page::new(items, params.total_pages(count), params.page))
    }

    pub async fn featured(&self) -> Result<Vec<Record>, ApiError> {
        let query = Query::builder()
            .filter(Filter::gt("rating", FEATURED_RATING))
            .build();

        Ok(self.books().await?.query(query).await?)
    }

    /// Returns the book as a zero- or one-element list.
    pub async fn get(&self, id: &str) -> Result<Vec<Record>, ApiError> {
        let id = RecordId::parse(id)?;

        Ok(self.books().await?.get(vec![id]).await?)
    }

    pub async fn create(&self, fields: Fields) -> Result<InsertAck, ApiError> {
        check_storable(&fields)?;

        let ack = self.books().await?.insert(fields).await?;
        tracing::info!(id = %ack.inserted_id, "book created");

        Ok(ack)
    }

    /// Merges `fields` into an existing book.
    pub async fn update(&self, id: &str, fields: Fields) -> Result<UpdateAck, ApiError> {
        let id = RecordId::parse(id)?;
        check_storable(&fields)?;

        let ack = self.books().await?.update(id, fields).await?;
        tracing::info!(%id, modified = ack.modified_count, "book updated");

        Ok(ack)
    }

    pub async fn delete(&self, id: &str) -> Result<DeleteAck, ApiError> {
        let id = RecordId::parse(id)?;

        let ack = self.books().await?.delete(id).await?;
        tracing::info!(%id, "book deleted");

        Ok(ack)
    }

    /// Connects if needed and pings the store.
    pub async fn ping(&self) -> StoreResult<()> {
        self.store.ping().await
    }
}

// Bodies that have no BSON form are the client's fault, not a storage failure.
fn check_storable(fields: &Fields) -> Result<(), ApiError> {
    fields_to_bson(fields)
        .map(|_| ())
        .map_err(|err| ApiError::BadRequest(err.to_string()))
}
