//! Lazily connected record store.
//!
//! A [`DocumentStore`] owns a backend builder and connects on first use. Concurrent first
//! callers share a single connection attempt; a failed attempt is not remembered, so the
//! next caller tries again.
//!
//! # Example
//!
//! ```ignore
//! use bookshelf_core::store::DocumentStore;
//!
//! let store = DocumentStore::new(MongoDbStoreBuilder::new(uri, "sample_books"));
//! // Nothing has connected yet.
//! let books = store.collection("books").await?;
//! let total = books.count().await?;
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;

use crate::{
    backend::{DynStoreBackendBuilder, StoreBackend, StoreBackendBuilder},
    collection::Collection,
    error::StoreResult,
};

/// A shared handle to a lazily connected backend.
///
/// Cloning is cheap and every clone observes the same connection.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    builder: Arc<dyn DynStoreBackendBuilder>,
    backend: Arc<OnceCell<Arc<dyn StoreBackend>>>,
}

impl DocumentStore {
    /// Creates a store that will connect through `builder` when first used.
    pub fn new<B>(builder: B) -> Self
    where
        B: StoreBackendBuilder + 'static,
        B::Backend: 'static,
    {
        Self {
            builder: Arc::new(builder),
            backend: Arc::new(OnceCell::new()),
        }
    }

    /// Creates a store around an already connected backend.
    pub fn from_backend<B>(backend: B) -> Self
    where
        B: StoreBackend + 'static,
    {
        let backend: Arc<dyn StoreBackend> = Arc::new(backend);

        Self {
            builder: Arc::new(Connected(Arc::clone(&backend))),
            backend: Arc::new(OnceCell::new_with(Some(backend))),
        }
    }

    /// Returns the connected backend, connecting first if needed.
    ///
    /// # Errors
    ///
    /// Returns whatever error the builder produced. The failure is not cached.
    pub async fn backend(&self) -> StoreResult<Arc<dyn StoreBackend>> {
        let backend = self
            .backend
            .get_or_try_init(|| self.builder.build_dyn())
            .await?;

        Ok(Arc::clone(backend))
    }

    /// Gets a handle to the named collection, connecting first if needed.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the collection
    pub async fn collection(&self, name: &str) -> StoreResult<Collection> {
        Ok(Collection::new(name.to_string(), self.backend().await?))
    }

    /// Whether a backend has been connected.
    pub fn is_connected(&self) -> bool {
        self.backend.initialized()
    }

    /// Connects if needed and checks the backend is reachable.
    pub async fn ping(&self) -> StoreResult<()> {
        self.backend().await?.ping().await
    }

    /// Shuts down the backend if one was ever connected.
    pub async fn shutdown(&self) -> StoreResult<()> {
        match self.backend.get() {
            Some(backend) => backend.shutdown().await,
            None => Ok(()),
        }
    }
}

#[derive(Debug)]
struct Connected(Arc<dyn StoreBackend>);

#[async_trait]
impl DynStoreBackendBuilder for Connected {
    async fn build_dyn(&self) -> StoreResult<Arc<dyn StoreBackend>> {
        Ok(Arc::clone(&self.0))
    }
}
