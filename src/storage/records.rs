//! Typed records over the key-value store.
//!
//! Key scheme:
//! - `documents_<email>`: a client's portal documents, newest first
//! - `notifications_<email>`: a client's notifications, newest first
//! - `registeredUsers`: email to user record
//! - `emailActivities`: sent emails, newest first
//! - `sessionDocuments`: results of anonymous processing runs
//! - `resolvedQueueItems`: ids of resolved review queue items

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;

use super::backend::{KeyValueStore, StoreError, StoreResult};
use crate::models::{EmailActivity, Notification, PortalDocument, ProcessedDocument, UserRecord};

pub const REGISTERED_USERS_KEY: &str = "registeredUsers";
pub const EMAIL_ACTIVITIES_KEY: &str = "emailActivities";
pub const SESSION_DOCUMENTS_KEY: &str = "sessionDocuments";
pub const RESOLVED_QUEUE_KEY: &str = "resolvedQueueItems";

/// Entries kept in the email activity log.
pub const EMAIL_ACTIVITY_LIMIT: usize = 50;

pub fn documents_key(email: &str) -> String {
    format!("documents_{}", email)
}

pub fn notifications_key(email: &str) -> String {
    format!("notifications_{}", email)
}

/// Typed access to stored collections. Missing keys read as empty.
///
/// Clones share one write lock, so read-modify-write updates made through
/// any clone never interleave.
#[derive(Clone)]
pub struct Records {
    store: Arc<dyn KeyValueStore>,
    write_lock: Arc<Mutex<()>>,
}

impl Records {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    async fn load<T>(&self, key: &str) -> StoreResult<T>
    where
        T: DeserializeOwned + Default,
    {
        match self.store.get(key).await? {
            Some(raw) => serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
                key: key.to_string(),
                source,
            }),
            None => Ok(T::default()),
        }
    }

    async fn save<T>(&self, key: &str, value: &T) -> StoreResult<()>
    where
        T: Serialize + ?Sized,
    {
        let raw = serde_json::to_string(value)?;
        self.store.set(key, raw).await
    }

    /// Load, modify and save one key while holding the write lock.
    async fn update<T, R, F>(&self, key: &str, modify: F) -> StoreResult<R>
    where
        T: Serialize + DeserializeOwned + Default,
        F: FnOnce(&mut T) -> R,
    {
        let _guard = self.write_lock.lock().await;
        let mut value: T = self.load(key).await?;
        let result = modify(&mut value);
        self.save(key, &value).await?;
        Ok(result)
    }

    pub async fn documents(&self, email: &str) -> StoreResult<Vec<PortalDocument>> {
        self.load(&documents_key(email)).await
    }

    /// File a document at the top of a client's list.
    pub async fn prepend_document(&self, email: &str, document: PortalDocument) -> StoreResult<()> {
        self.update(&documents_key(email), |docs: &mut Vec<PortalDocument>| {
            docs.insert(0, document)
        })
        .await
    }

    pub async fn notifications(&self, email: &str) -> StoreResult<Vec<Notification>> {
        self.load(&notifications_key(email)).await
    }

    pub async fn prepend_notification(
        &self,
        email: &str,
        notification: Notification,
    ) -> StoreResult<()> {
        self.update(&notifications_key(email), |list: &mut Vec<Notification>| {
            list.insert(0, notification)
        })
        .await
    }

    /// Mark every notification of a client read. Returns how many changed.
    pub async fn mark_notifications_read(&self, email: &str) -> StoreResult<usize> {
        self.update(&notifications_key(email), |list: &mut Vec<Notification>| {
            let mut changed = 0;
            for notification in list.iter_mut().filter(|n| !n.read) {
                notification.read = true;
                changed += 1;
            }
            changed
        })
        .await
    }

    pub async fn registered_users(&self) -> StoreResult<BTreeMap<String, UserRecord>> {
        self.load(REGISTERED_USERS_KEY).await
    }

    /// Add or replace a user in the directory.
    pub async fn register_user(&self, email: &str, user: UserRecord) -> StoreResult<()> {
        self.update(REGISTERED_USERS_KEY, |users: &mut BTreeMap<String, UserRecord>| {
            users.insert(email.to_string(), user);
        })
        .await
    }

    pub async fn email_activities(&self) -> StoreResult<Vec<EmailActivity>> {
        self.load(EMAIL_ACTIVITIES_KEY).await
    }

    /// Prepend an activity, keeping only the most recent entries.
    pub async fn log_email_activity(&self, activity: EmailActivity) -> StoreResult<()> {
        self.update(EMAIL_ACTIVITIES_KEY, |activities: &mut Vec<EmailActivity>| {
            activities.insert(0, activity);
            activities.truncate(EMAIL_ACTIVITY_LIMIT);
        })
        .await
    }

    pub async fn session_documents(&self) -> StoreResult<Vec<ProcessedDocument>> {
        self.load(SESSION_DOCUMENTS_KEY).await
    }

    pub async fn append_session_documents(&self, docs: &[ProcessedDocument]) -> StoreResult<()> {
        self.update(SESSION_DOCUMENTS_KEY, |stored: &mut Vec<ProcessedDocument>| {
            stored.extend_from_slice(docs)
        })
        .await
    }

    pub async fn clear_session_documents(&self) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        self.store.remove(SESSION_DOCUMENTS_KEY).await
    }

    pub async fn resolved_queue_items(&self) -> StoreResult<BTreeSet<String>> {
        self.load(RESOLVED_QUEUE_KEY).await
    }

    /// Mark a queue item resolved. Returns false if it already was.
    pub async fn resolve_queue_item(&self, item_id: &str) -> StoreResult<bool> {
        self.update(RESOLVED_QUEUE_KEY, |resolved: &mut BTreeSet<String>| {
            resolved.insert(item_id.to_string())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::NotificationKind;
    use crate::storage::{JsonFileStore, MemoryStore};

    fn records() -> Records {
        Records::new(Arc::new(MemoryStore::new()))
    }

    fn activity(n: usize) -> EmailActivity {
        EmailActivity {
            timestamp: Utc::now(),
            recipient: format!("client{}@demo.com", n),
            subject: format!("subject {}", n),
            sender: "admin@demo.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_missing_keys_read_empty() {
        let records = records();
        assert!(records.documents("nobody@demo.com").await.unwrap().is_empty());
        assert!(records.registered_users().await.unwrap().is_empty());
        assert!(records.resolved_queue_items().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_activity_log_is_capped_newest_first() {
        let records = records();
        for n in 0..55 {
            records.log_email_activity(activity(n)).await.unwrap();
        }

        let activities = records.email_activities().await.unwrap();
        assert_eq!(activities.len(), EMAIL_ACTIVITY_LIMIT);
        assert_eq!(activities[0].recipient, "client54@demo.com");
        assert_eq!(activities[49].recipient, "client5@demo.com");
    }

    #[tokio::test]
    async fn test_register_user_overwrites() {
        let records = records();
        records
            .register_user("a@demo.com", UserRecord::client("First"))
            .await
            .unwrap();
        records
            .register_user("a@demo.com", UserRecord::client("Second"))
            .await
            .unwrap();

        let users = records.registered_users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users["a@demo.com"].name, "Second");
    }

    #[tokio::test]
    async fn test_resolve_is_idempotent() {
        let records = records();
        assert!(records.resolve_queue_item("q_doc_1").await.unwrap());
        assert!(!records.resolve_queue_item("q_doc_1").await.unwrap());
        assert!(records.resolved_queue_items().await.unwrap().contains("q_doc_1"));
    }

    #[tokio::test]
    async fn test_corrupt_value_surfaces() {
        let records = records();
        records
            .store()
            .set(EMAIL_ACTIVITIES_KEY, "{broken".to_string())
            .await
            .unwrap();
        assert!(matches!(
            records.email_activities().await,
            Err(StoreError::Corrupt { .. })
        ));
    }

    async fn append_concurrently(records: Records, writers: usize) {
        let tasks: Vec<_> = (0..writers)
            .map(|n| {
                let records = records.clone();
                tokio::spawn(async move {
                    let doc = ProcessedDocument::failed(&format!("doc_{}.pdf", n), 10, "x".into());
                    records.append_session_documents(&[doc]).await.unwrap();
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_keep_every_document() {
        let records = records();
        append_concurrently(records.clone(), 32).await;
        assert_eq!(records.session_documents().await.unwrap().len(), 32);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(&dir.path().join("store.json"));
        let records = Records::new(Arc::new(store));
        append_concurrently(records.clone(), 32).await;

        let mut names: Vec<String> = records
            .session_documents()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.filename)
            .collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 32);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_client_updates() {
        let records = records();
        let email = "client@demo.com";
        let tasks: Vec<_> = (0..16)
            .map(|n| {
                let records = records.clone();
                tokio::spawn(async move {
                    let doc = ProcessedDocument::failed(&format!("scan_{}.pdf", n), 1, "x".into());
                    records
                        .prepend_document(email, PortalDocument::from_processed(&doc, email))
                        .await
                        .unwrap();
                    records
                        .prepend_notification(
                            email,
                            Notification::new(NotificationKind::Success, "Uploaded", n.to_string()),
                        )
                        .await
                        .unwrap();
                    records
                        .register_user(&format!("user{}@demo.com", n), UserRecord::client("U"))
                        .await
                        .unwrap();
                    records.resolve_queue_item(&format!("q_{}", n)).await.unwrap();
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(records.documents(email).await.unwrap().len(), 16);
        assert_eq!(records.notifications(email).await.unwrap().len(), 16);
        assert_eq!(records.registered_users().await.unwrap().len(), 16);
        assert_eq!(records.resolved_queue_items().await.unwrap().len(), 16);
        assert_eq!(records.mark_notifications_read(email).await.unwrap(), 16);
    }
}
