//! # Service configuration
//!
//! Reads the catalog server's settings from environment variables once at startup.

use std::{env, str::FromStr};

use thiserror::Error;

/// Which storage backend serves the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    #[default]
    MongoDb,
    Memory,
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mongodb" => Ok(Self::MongoDb),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PORT must be a valid port number, got {0:?}")]
    InvalidPort(String),

    #[error("STORE_BACKEND must be \"mongodb\" or \"memory\", got {0:?}")]
    UnknownBackend(String),

    #[error("STORE_BACKEND=mongodb requires the `mongodb` feature")]
    BackendUnavailable,
}

/// Catalog server settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Bind address
    pub host: String,
    /// Port number
    pub port: u16,
    /// MongoDB connection string; may be empty, in which case the first store use fails
    pub db_uri: String,
    pub db_name: String,
    pub db_collection: String,
    pub backend: BackendKind,
}

impl ServiceConfig {
    /// Loads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads the configuration from an arbitrary key lookup.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `HOST` | `0.0.0.0` |
    /// | `PORT` | `3001` |
    /// | `DB_URI` | empty |
    /// | `DB_NAME` | `sample_books` |
    /// | `DB_COLLECTION` | `books` |
    /// | `STORE_BACKEND` | `mongodb` |
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => 3001,
        };

        let backend = match lookup("STORE_BACKEND") {
            Some(raw) => raw.trim().parse()?,
            None => BackendKind::default(),
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            db_uri: lookup("DB_URI").unwrap_or_default(),
            db_name: lookup("DB_NAME").unwrap_or_else(|| "sample_books".to_string()),
            db_collection: lookup("DB_COLLECTION").unwrap_or_else(|| "books".to_string()),
            backend,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
