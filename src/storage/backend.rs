//! Key-value storage abstraction.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Corrupt value under {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Flat string key-value store holding JSON documents.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &'static str;

    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    async fn set(&self, key: &str, value: String) -> StoreResult<()>;

    async fn remove(&self, key: &str) -> StoreResult<()>;

    /// All keys, sorted.
    async fn keys(&self) -> StoreResult<Vec<String>>;
}

/// Which backend to open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StoreKind {
    Memory,
    Json,
    #[default]
    Sqlite,
}

impl StoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Json => "json",
            Self::Sqlite => "sqlite",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" => Some(Self::Memory),
            "json" => Some(Self::Json),
            "sqlite" => Some(Self::Sqlite),
            _ => None,
        }
    }
}
