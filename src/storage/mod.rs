//! Persistence for portal documents, notifications and dashboard state.
//!
//! Everything is stored as JSON strings behind [`KeyValueStore`]. Three
//! backends are available: in-memory, a single JSON file, and SQLite.

mod backend;
mod json_file;
mod memory;
mod records;
mod sqlite;

use std::path::Path;
use std::sync::Arc;

pub use backend::{KeyValueStore, StoreError, StoreKind, StoreResult};
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use records::{
    documents_key, notifications_key, Records, EMAIL_ACTIVITIES_KEY, EMAIL_ACTIVITY_LIMIT,
    REGISTERED_USERS_KEY, RESOLVED_QUEUE_KEY, SESSION_DOCUMENTS_KEY,
};
pub use sqlite::SqliteStore;

/// File name of the JSON store inside the data directory.
pub const JSON_STORE_FILE: &str = "store.json";

/// File name of the SQLite database inside the data directory.
pub const SQLITE_STORE_FILE: &str = "docsorter.db";

/// Open a store of the given kind rooted at `data_dir`.
pub fn open_store(kind: StoreKind, data_dir: &Path) -> StoreResult<Arc<dyn KeyValueStore>> {
    let store: Arc<dyn KeyValueStore> = match kind {
        StoreKind::Memory => Arc::new(MemoryStore::new()),
        StoreKind::Json => Arc::new(JsonFileStore::new(&data_dir.join(JSON_STORE_FILE))),
        StoreKind::Sqlite => Arc::new(SqliteStore::new(&data_dir.join(SQLITE_STORE_FILE))?),
    };
    tracing::debug!("Opened {} store in {}", store.name(), data_dir.display());
    Ok(store)
}
