//! Admin dashboard: clients, the review queue, and client emails.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ServiceError;
use crate::email::{EmailClient, EmailTemplate, RenderedEmail, TemplateContext};
use crate::models::{
    default_users, ClientStatus, ClientSummary, DocumentType, EmailActivity, PortalDocument,
    PortalStatus, UserRecord, UserRole,
};
use crate::pipeline::Folder;
use crate::storage::{Records, StoreResult};

/// Why a document sits in the review queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueKind {
    Password,
    Review,
    Error,
}

impl QueueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Password => "password",
            Self::Review => "review",
            Self::Error => "error",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "password" => Some(Self::Password),
            "review" => Some(Self::Review),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Password => "Password Protected",
            Self::Review => "Manual Review",
            Self::Error => "Processing Error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
        }
    }
}

/// A document waiting on an admin.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueItem {
    /// `q_` followed by the document id.
    pub id: String,
    pub document_id: String,
    pub filename: String,
    pub client_email: String,
    pub client_name: String,
    #[serde(rename = "type")]
    pub kind: QueueKind,
    pub priority: Priority,
    pub upload_time: DateTime<Utc>,
    pub issue: &'static str,
    pub action: &'static str,
}

impl QueueItem {
    fn for_document(doc: &PortalDocument, client: &ClientSummary) -> Self {
        let (kind, priority, issue) = if doc.details.contains("password") {
            (
                QueueKind::Password,
                Priority::High,
                "Document is password-protected and cannot be processed",
            )
        } else if doc.status == PortalStatus::Error {
            (
                QueueKind::Error,
                Priority::High,
                "Processing failed - document may be corrupted",
            )
        } else {
            (
                QueueKind::Review,
                Priority::Medium,
                "Document requires manual review",
            )
        };

        let action = match kind {
            QueueKind::Password => "Email client for resubmission",
            QueueKind::Review | QueueKind::Error => "Manual review required",
        };

        Self {
            id: format!("q_{}", doc.id),
            document_id: doc.id.clone(),
            filename: doc.filename.clone(),
            client_email: client.email.clone(),
            client_name: client.name.clone(),
            kind,
            priority,
            upload_time: doc.upload_time,
            issue,
            action,
        }
    }
}

/// A portal document together with the account it belongs to.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDocument {
    #[serde(flatten)]
    pub document: PortalDocument,
    pub owner_name: String,
    pub owner_email: String,
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_documents: usize,
    pub processed_docs: usize,
    /// Open review queue items.
    pub review_docs: usize,
    pub active_clients: usize,
}

/// Pick the email template for a document card.
///
/// TODO: choose review_unwanted for unwanted documents once review
/// documents carry their outcome (e.g. by inspecting `details`).
pub fn email_type_for(status: PortalStatus, doc_type: Option<DocumentType>) -> EmailTemplate {
    match (status, doc_type) {
        (PortalStatus::Completed, Some(DocumentType::Rdl)) => EmailTemplate::CompletedRdl,
        (PortalStatus::Completed, Some(DocumentType::Rcs)) => EmailTemplate::CompletedRcs,
        (PortalStatus::Completed, _) => EmailTemplate::General,
        (PortalStatus::Review, _) => EmailTemplate::ReviewUnknown,
        (PortalStatus::Error, _) => EmailTemplate::Error,
        (PortalStatus::Processing, _) => EmailTemplate::General,
    }
}

/// Cross-client view for administrators.
pub struct AdminDashboard {
    records: Records,
    email: EmailClient,
    sender: String,
}

impl AdminDashboard {
    /// `sender` is recorded as the author of emails sent from here.
    pub fn new(records: Records, email: EmailClient, sender: &str) -> Self {
        Self {
            records,
            email,
            sender: sender.to_string(),
        }
    }

    /// Add a client account to the user directory.
    pub async fn register_client(&self, email: &str, name: &str) -> StoreResult<()> {
        tracing::info!("Registering client {} <{}>", name, email);
        self.records
            .register_user(email, UserRecord::client(name))
            .await
    }

    /// Built-in users merged with registered ones, clients only.
    ///
    /// A registered user replaces a built-in one with the same email.
    pub async fn clients(&self) -> StoreResult<Vec<ClientSummary>> {
        let mut users = default_users();
        for (email, user) in self.records.registered_users().await? {
            match users.iter_mut().find(|(existing, _)| *existing == email) {
                Some(entry) => entry.1 = user,
                None => users.push((email, user)),
            }
        }

        let today = Utc::now().date_naive();
        let mut clients = Vec::new();
        for (index, (email, user)) in users.into_iter().enumerate() {
            if user.role != UserRole::Client {
                continue;
            }
            let docs = self.records.documents(&email).await?;
            let last_activity = docs
                .iter()
                .map(|d| d.upload_time)
                .max()
                .map(|t| t.date_naive())
                .unwrap_or(today);

            clients.push(ClientSummary {
                id: index + 1,
                name: user.name,
                email,
                status: ClientStatus::Active,
                documents: docs.len(),
                last_activity,
            });
        }
        Ok(clients)
    }

    /// Every client's documents, annotated with the owning account.
    pub async fn all_documents(&self) -> StoreResult<Vec<ClientDocument>> {
        let mut all = Vec::new();
        for client in self.clients().await? {
            for document in self.records.documents(&client.email).await? {
                all.push(ClientDocument {
                    document,
                    owner_name: client.name.clone(),
                    owner_email: client.email.clone(),
                });
            }
        }
        Ok(all)
    }

    pub async fn filter_documents(&self, folder: Folder) -> StoreResult<Vec<ClientDocument>> {
        let docs = self.all_documents().await?;
        Ok(docs
            .into_iter()
            .filter(|d| folder.contains_portal(&d.document))
            .collect())
    }

    /// Open review items across all clients.
    pub async fn processing_queue(&self) -> StoreResult<Vec<QueueItem>> {
        let resolved = self.records.resolved_queue_items().await?;
        let mut queue = Vec::new();
        for client in self.clients().await? {
            for doc in self.records.documents(&client.email).await? {
                if !doc.status.needs_attention() {
                    continue;
                }
                let item = QueueItem::for_document(&doc, &client);
                if !resolved.contains(&item.id) {
                    queue.push(item);
                }
            }
        }
        Ok(queue)
    }

    /// Queue items of one kind, or all of them.
    pub async fn filter_queue(&self, kind: Option<QueueKind>) -> StoreResult<Vec<QueueItem>> {
        let queue = self.processing_queue().await?;
        Ok(match kind {
            Some(kind) => queue.into_iter().filter(|item| item.kind == kind).collect(),
            None => queue,
        })
    }

    /// Resolve an open queue item. Returns false if no such item is open.
    pub async fn resolve(&self, item_id: &str) -> StoreResult<bool> {
        let open = self
            .processing_queue()
            .await?
            .iter()
            .any(|item| item.id == item_id);
        if !open {
            return Ok(false);
        }
        tracing::info!("Resolved queue item {}", item_id);
        self.records.resolve_queue_item(item_id).await
    }

    pub async fn stats(&self) -> StoreResult<DashboardStats> {
        let clients = self.clients().await?;
        let docs = self.all_documents().await?;
        let queue = self.processing_queue().await?;

        Ok(DashboardStats {
            total_documents: docs.len(),
            processed_docs: docs
                .iter()
                .filter(|d| d.document.status == PortalStatus::Completed)
                .count(),
            review_docs: queue.len(),
            active_clients: clients
                .iter()
                .filter(|c| c.status == ClientStatus::Active)
                .count(),
        })
    }

    /// Render a template, filling in document data when available.
    pub fn compose(
        &self,
        template: EmailTemplate,
        filename: &str,
        document: Option<&PortalDocument>,
    ) -> RenderedEmail {
        let ctx = TemplateContext::new(filename).with_client(
            document.and_then(|d| d.client_name.as_deref()),
            document.and_then(|d| d.processed_name.as_deref()),
        );
        template.render(&ctx)
    }

    /// Compose the suggested email for a document.
    pub fn compose_for_document(&self, document: &PortalDocument) -> (EmailTemplate, RenderedEmail) {
        let template = email_type_for(document.status, document.doc_type);
        let email = self.compose(template, &document.filename, Some(document));
        (template, email)
    }

    /// Send an email and record it in the activity log.
    pub async fn send_email(
        &self,
        recipient: &str,
        subject: &str,
        message: &str,
    ) -> Result<(), ServiceError> {
        self.email.send(recipient, subject, message).await?;
        tracing::info!("Email sent to {}", recipient);

        self.records
            .log_email_activity(EmailActivity {
                timestamp: Utc::now(),
                recipient: recipient.to_string(),
                subject: subject.to_string(),
                sender: self.sender.clone(),
            })
            .await?;
        Ok(())
    }

    pub async fn test_email_connection(&self) -> Result<(), ServiceError> {
        self.email.test_connection().await?;
        Ok(())
    }

    pub async fn email_activities(&self) -> StoreResult<Vec<EmailActivity>> {
        self.records.email_activities().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::extract::{FixedSource, SyntheticExtractor};
    use crate::models::UploadedFile;
    use crate::pipeline::Pipeline;
    use crate::services::ClientPortal;
    use crate::storage::MemoryStore;

    fn records() -> Records {
        Records::new(Arc::new(MemoryStore::new()))
    }

    fn dashboard(records: &Records) -> AdminDashboard {
        let email = EmailClient::new("http://127.0.0.1:9").unwrap();
        AdminDashboard::new(records.clone(), email, "admin@demo.com")
    }

    async fn upload(records: &Records, email: &str, names: &[&str]) {
        let extractor = SyntheticExtractor::new(Arc::new(FixedSource::new(0)));
        let portal = ClientPortal::new(email, Pipeline::new(Arc::new(extractor)), records.clone());
        let files: Vec<_> = names
            .iter()
            .map(|n| UploadedFile::new(*n, "application/pdf", 100))
            .collect();
        portal.upload(&files).await.unwrap();
    }

    #[tokio::test]
    async fn test_clients_merge_registered_users() {
        let records = records();
        records
            .register_user("john@client.com", UserRecord::client("Johnny Smith"))
            .await
            .unwrap();
        records
            .register_user("new@client.com", UserRecord::client("New Client"))
            .await
            .unwrap();
        records
            .register_user(
                "boss@demo.com",
                UserRecord {
                    name: "Boss".to_string(),
                    role: UserRole::Admin,
                },
            )
            .await
            .unwrap();

        let clients = dashboard(&records).clients().await.unwrap();
        let names: Vec<_> = clients.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Demo Client", "Johnny Smith", "New Client"]);
        assert_eq!(clients[1].id, 2);
    }

    #[tokio::test]
    async fn test_queue_kinds_and_resolution() {
        let records = records();
        upload(
            &records,
            "client@demo.com",
            &["protected.pdf", "notes_license.pdf", "rdl.pdf"],
        )
        .await;
        let dashboard = dashboard(&records);

        let queue = dashboard.processing_queue().await.unwrap();
        assert_eq!(queue.len(), 2);

        let password = queue.iter().find(|i| i.filename == "protected.pdf").unwrap();
        assert_eq!(password.kind, QueueKind::Password);
        assert_eq!(password.priority, Priority::High);
        assert_eq!(password.action, "Email client for resubmission");
        assert!(password.id.starts_with("q_doc_"));

        let unwanted = queue.iter().find(|i| i.filename == "notes_license.pdf").unwrap();
        assert_eq!(unwanted.kind, QueueKind::Review);
        assert_eq!(unwanted.priority, Priority::Medium);
        assert_eq!(unwanted.action, "Manual review required");

        let only_password = dashboard
            .filter_queue(Some(QueueKind::Password))
            .await
            .unwrap();
        assert_eq!(only_password.len(), 1);

        assert!(dashboard.resolve(&password.id).await.unwrap());
        assert!(!dashboard.resolve(&password.id).await.unwrap());
        assert!(!dashboard.resolve("q_missing").await.unwrap());
        assert_eq!(dashboard.processing_queue().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_stats_count_open_queue_once() {
        let records = records();
        upload(&records, "client@demo.com", &["rdl.pdf", "protected.pdf"]).await;
        upload(&records, "john@client.com", &["auth.pdf"]).await;

        let stats = dashboard(&records).stats().await.unwrap();
        assert_eq!(
            stats,
            DashboardStats {
                total_documents: 3,
                processed_docs: 2,
                review_docs: 1,
                active_clients: 2,
            }
        );
    }

    #[tokio::test]
    async fn test_filter_documents_by_folder() {
        let records = records();
        upload(
            &records,
            "client@demo.com",
            &["rdl.pdf", "auth.pdf", "protected.pdf", "misc.pdf"],
        )
        .await;
        let dashboard = dashboard(&records);

        let rdl = dashboard.filter_documents(Folder::Rdl).await.unwrap();
        assert_eq!(rdl.len(), 1);
        assert_eq!(rdl[0].owner_name, "Demo Client");

        assert_eq!(dashboard.filter_documents(Folder::Rcs).await.unwrap().len(), 1);
        // Unknown documents stay in processing and are not in review.
        assert_eq!(dashboard.filter_documents(Folder::Review).await.unwrap().len(), 1);
        assert_eq!(dashboard.filter_documents(Folder::All).await.unwrap().len(), 4);
    }

    #[test]
    fn test_email_type_selection() {
        assert_eq!(
            email_type_for(PortalStatus::Completed, Some(DocumentType::Rdl)),
            EmailTemplate::CompletedRdl
        );
        assert_eq!(
            email_type_for(PortalStatus::Completed, Some(DocumentType::Rcs)),
            EmailTemplate::CompletedRcs
        );
        assert_eq!(
            email_type_for(PortalStatus::Completed, None),
            EmailTemplate::General
        );
        assert_eq!(email_type_for(PortalStatus::Error, None), EmailTemplate::Error);
        assert_eq!(
            email_type_for(PortalStatus::Processing, Some(DocumentType::Review)),
            EmailTemplate::General
        );
    }

    #[test]
    fn test_review_always_gets_unknown_template() {
        // Unwanted documents currently get the unknown-type email too.
        assert_eq!(
            email_type_for(PortalStatus::Review, Some(DocumentType::Review)),
            EmailTemplate::ReviewUnknown
        );
    }

    #[tokio::test]
    async fn test_send_failure_logs_nothing() {
        let records = records();
        let dashboard = dashboard(&records);
        assert!(dashboard.send_email("a@b.com", "s", "m").await.is_err());
        assert!(dashboard.email_activities().await.unwrap().is_empty());
    }
}
