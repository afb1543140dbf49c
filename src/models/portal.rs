//! Client portal document records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::document::{DocumentType, ProcessedDocument, ProcessingStatus};
use crate::utils::format_size;

/// Portal-facing lifecycle status of a client document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortalStatus {
    Processing,
    Completed,
    Review,
    Error,
}

impl PortalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Review => "review",
            Self::Error => "error",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "processing" => Some(Self::Processing),
            "completed" => Some(Self::Completed),
            "review" => Some(Self::Review),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Processing => "Processing",
            Self::Completed => "Completed",
            Self::Review => "Needs Review",
            Self::Error => "Error",
        }
    }

    /// Map a pipeline outcome onto the portal lifecycle.
    ///
    /// Unknown documents stay `Processing` until someone reviews them.
    pub fn from_outcome(status: ProcessingStatus) -> Self {
        match status {
            ProcessingStatus::Processed => Self::Completed,
            ProcessingStatus::PasswordProtected | ProcessingStatus::Unwanted => Self::Review,
            ProcessingStatus::Unknown => Self::Processing,
            ProcessingStatus::Failed => Self::Error,
        }
    }

    /// Whether a document in this status belongs in the review queue.
    pub fn needs_attention(&self) -> bool {
        matches!(self, Self::Review | Self::Error)
    }
}

/// A document as stored in a client's portal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalDocument {
    pub id: String,
    pub filename: String,
    pub upload_time: DateTime<Utc>,
    pub status: PortalStatus,
    /// Upload size in bytes.
    pub size: u64,
    pub user_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_name: Option<String>,
    #[serde(default)]
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<DocumentType>,
}

impl PortalDocument {
    /// File a processed document into a client's portal.
    pub fn from_processed(doc: &ProcessedDocument, user_email: &str) -> Self {
        Self {
            id: format!("doc_{}", uuid::Uuid::new_v4().simple()),
            filename: doc.filename.clone(),
            upload_time: doc.timestamp,
            status: PortalStatus::from_outcome(doc.status),
            size: doc.size,
            user_email: user_email.to_string(),
            processed_name: doc.new_filename.clone(),
            details: doc.details.clone(),
            client_name: doc.client_name.clone(),
            doc_type: Some(doc.classified_type),
        }
    }

    pub fn display_size(&self) -> String {
        format_size(self.size)
    }

    /// True if the generated name marks this as the given type.
    pub fn processed_as(&self, doc_type: DocumentType) -> bool {
        self.processed_name
            .as_deref()
            .map(|name| name.contains(doc_type.as_str()))
            .unwrap_or(false)
    }
}
