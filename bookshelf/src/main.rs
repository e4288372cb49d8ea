//! # Bookshelf server
//!
//! Serves the book catalog over HTTP.
//!
//! ## Environment
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `HOST` | `0.0.0.0` | Bind address |
//! | `PORT` | `3001` | Port number |
//! | `DB_URI` | empty | MongoDB connection string |
//! | `DB_NAME` | `sample_books` | Database name |
//! | `DB_COLLECTION` | `books` | Collection name |
//! | `STORE_BACKEND` | `mongodb` | `mongodb` or `memory` |
//! | `LOG_FORMAT` | `pretty` | `json` or `pretty` |
//!
//! ```bash
//! STORE_BACKEND=memory cargo run -p bookshelf
//! DB_URI=mongodb://localhost:27017 cargo run -p bookshelf --release
//! ```

use std::sync::Arc;

use bookshelf::{
    app,
    catalog::BookCatalog,
    config::{BackendKind, ConfigError, ServiceConfig},
    handler::AppState,
    observability::{TracingConfig, init_tracing, root_span},
};
use bookshelf_core::DocumentStore;
use bookshelf_memory::InMemoryStore;
use tokio::net::TcpListener;

fn store_for(config: &ServiceConfig) -> Result<DocumentStore, ConfigError> {
    match config.backend {
        BackendKind::Memory => Ok(DocumentStore::new(InMemoryStore::builder())),
        #[cfg(feature = "mongodb")]
        BackendKind::MongoDb => Ok(DocumentStore::new(
            bookshelf_mongodb::MongoDbStore::builder(&config.db_uri, &config.db_name),
        )),
        #[cfg(not(feature = "mongodb"))]
        BackendKind::MongoDb => Err(ConfigError::BackendUnavailable),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let tracing_config = TracingConfig::from_env("bookshelf");
    init_tracing(&tracing_config);
    let _app_span = root_span(&tracing_config).entered();

    let config = ServiceConfig::from_env()?;
    tracing::info!(
        backend = ?config.backend,
        database = %config.db_name,
        collection = %config.db_collection,
        "starting bookshelf on {}",
        config.bind_address(),
    );

    // Connects on first use; an unusable DB_URI surfaces as a 500 on the first request.
    let store = store_for(&config)?;
    let state = Arc::new(AppState {
        catalog: BookCatalog::new(store.clone(), config.db_collection.clone()),
    });

    let listener = TcpListener::bind(config.bind_address()).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.shutdown().await?;
    tracing::info!("bookshelf stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
