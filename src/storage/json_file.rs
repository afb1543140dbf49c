//! Single JSON file store.
//!
//! The whole map is rewritten on every change through a temp file and a
//! rename, so a crash never leaves a half-written store behind.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::backend::{KeyValueStore, StoreError, StoreResult};

pub struct JsonFileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> StoreResult<BTreeMap<String, String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
                key: self.path.display().to_string(),
                source,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn persist(&self, entries: &BTreeMap<String, String>) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    fn name(&self) -> &'static str {
        "json"
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, key: &str, value: String) -> StoreResult<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        entries.insert(key.to_string(), value);
        self.persist(&entries).await
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        if entries.remove(key).is_some() {
            self.persist(&entries).await?;
        }
        Ok(())
    }

    async fn keys(&self) -> StoreResult<Vec<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.into_keys().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let store = JsonFileStore::new(&path);
        store.set("registeredUsers", "{}".to_string()).await.unwrap();
        store.set("emailActivities", "[]".to_string()).await.unwrap();
        drop(store);

        let reopened = JsonFileStore::new(&path);
        assert_eq!(
            reopened.get("registeredUsers").await.unwrap().as_deref(),
            Some("{}")
        );
        assert_eq!(
            reopened.keys().await.unwrap(),
            vec!["emailActivities", "registeredUsers"]
        );

        reopened.remove("registeredUsers").await.unwrap();
        assert_eq!(reopened.get("registeredUsers").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(&dir.path().join("absent.json"));
        assert!(store.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "not json").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(matches!(
            store.get("anything").await,
            Err(StoreError::Corrupt { .. })
        ));
    }
}
