//! Client portal: upload documents and follow their status.

use serde::Serialize;

use crate::models::{
    Notification, NotificationKind, PortalDocument, PortalStatus, ProcessedDocument,
    ProcessingStatus, UploadedFile,
};
use crate::pipeline::Pipeline;
use crate::storage::{Records, StoreResult};

/// What happened to one uploaded file.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum UploadOutcome {
    /// The file was classified and filed.
    Filed { document: PortalDocument },
    /// The file could not be processed; nothing was filed.
    Failed { filename: String, error: String },
}

impl UploadOutcome {
    pub fn filename(&self) -> &str {
        match self {
            Self::Filed { document } => &document.filename,
            Self::Failed { filename, .. } => filename,
        }
    }
}

/// Upload counters for one client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PortalStats {
    pub total: usize,
    pub completed: usize,
    pub review: usize,
    pub processing: usize,
}

impl PortalStats {
    /// Documents still waiting on someone.
    pub fn pending(&self) -> usize {
        self.review + self.processing
    }
}

/// One client's view of their documents and notifications.
pub struct ClientPortal {
    email: String,
    pipeline: Pipeline,
    records: Records,
}

impl ClientPortal {
    pub fn new(email: &str, pipeline: Pipeline, records: Records) -> Self {
        Self {
            email: email.to_string(),
            pipeline,
            records,
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub async fn documents(&self) -> StoreResult<Vec<PortalDocument>> {
        self.records.documents(&self.email).await
    }

    pub async fn notifications(&self) -> StoreResult<Vec<Notification>> {
        self.records.notifications(&self.email).await
    }

    /// Upload files one at a time, saving after each.
    pub async fn upload(&self, files: &[UploadedFile]) -> StoreResult<Vec<UploadOutcome>> {
        let mut outcomes = Vec::with_capacity(files.len());
        for (index, file) in files.iter().enumerate() {
            if index > 0 && !self.pipeline.pacing().is_zero() {
                tokio::time::sleep(self.pipeline.pacing()).await;
            }
            outcomes.push(self.upload_file(file).await?);
        }
        Ok(outcomes)
    }

    /// Run one file through the pipeline and file the result.
    ///
    /// A pipeline failure is reported through an "Upload Failed"
    /// notification rather than an error; only storage failures propagate.
    pub async fn upload_file(&self, file: &UploadedFile) -> StoreResult<UploadOutcome> {
        let processed = self.pipeline.process_or_record(file).await;
        self.file_processed(&processed).await
    }

    /// File a pipeline result into this portal and notify the client.
    pub async fn file_processed(&self, processed: &ProcessedDocument) -> StoreResult<UploadOutcome> {
        let name = &processed.filename;

        if processed.is_error() {
            tracing::warn!("Upload of {} for {} failed: {}", name, self.email, processed.details);
            self.notify(
                NotificationKind::Error,
                "Upload Failed",
                format!("Failed to upload {}: {}", name, processed.details),
            )
            .await?;

            return Ok(UploadOutcome::Failed {
                filename: name.clone(),
                error: processed.details.clone(),
            });
        }

        let document = PortalDocument::from_processed(processed, &self.email);
        self.file_document(document.clone()).await?;

        if processed.status == ProcessingStatus::PasswordProtected {
            tracing::info!(
                "{} uploaded a password-protected document: {}",
                self.email,
                name
            );
            self.notify(
                NotificationKind::Warning,
                "Password-Protected Document",
                format!(
                    "Your document \"{}\" is password-protected. Please resubmit without password protection.",
                    name
                ),
            )
            .await?;
        }

        self.notify(
            NotificationKind::Success,
            "Document Uploaded",
            format!("{} has been uploaded successfully", name),
        )
        .await?;

        Ok(UploadOutcome::Filed { document })
    }

    pub async fn stats(&self) -> StoreResult<PortalStats> {
        let docs = self.documents().await?;
        Ok(docs.iter().fold(PortalStats::default(), |mut stats, doc| {
            stats.total += 1;
            match doc.status {
                PortalStatus::Completed => stats.completed += 1,
                PortalStatus::Review => stats.review += 1,
                PortalStatus::Processing => stats.processing += 1,
                PortalStatus::Error => {}
            }
            stats
        }))
    }

    /// Mark every notification read. Returns how many changed.
    pub async fn mark_notifications_read(&self) -> StoreResult<usize> {
        self.records.mark_notifications_read(&self.email).await
    }

    async fn file_document(&self, document: PortalDocument) -> StoreResult<()> {
        self.records.prepend_document(&self.email, document).await
    }

    async fn notify(&self, kind: NotificationKind, title: &str, message: String) -> StoreResult<()> {
        self.records
            .prepend_notification(&self.email, Notification::new(kind, title, message))
            .await
    }
}
