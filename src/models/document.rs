//! Processed document records produced by the classification pipeline.
//!
//! A `ProcessedDocument` is created once per upload and never mutated
//! afterwards. Records carry no identity guarantees across runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::format_size;

/// Client name used when none could be extracted.
pub const UNKNOWN_CLIENT: &str = "UNKNOWN_CLIENT";

/// Category a document was sorted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentType {
    /// Rating Decision Letter.
    Rdl,
    /// Records/Client Services authorization form.
    Rcs,
    /// Needs manual handling.
    Review,
    /// Processing failed.
    Error,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rdl => "RDL",
            Self::Rcs => "RCS",
            Self::Review => "REVIEW",
            Self::Error => "ERROR",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "RDL" => Some(Self::Rdl),
            "RCS" => Some(Self::Rcs),
            "REVIEW" => Some(Self::Review),
            "ERROR" => Some(Self::Error),
            _ => None,
        }
    }

    /// Human-readable label shown on result cards.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Rdl => "Rating Decision Letter",
            Self::Rcs => "Records/Client Services",
            Self::Review => "Needs Review",
            Self::Error => "Processing Error",
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome label attached to a processed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessingStatus {
    Processed,
    PasswordProtected,
    Unwanted,
    Unknown,
    Failed,
}

impl ProcessingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processed => "PROCESSED",
            Self::PasswordProtected => "PASSWORD_PROTECTED",
            Self::Unwanted => "UNWANTED",
            Self::Unknown => "UNKNOWN",
            Self::Failed => "Processing failed",
        }
    }
}

impl std::fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of running one upload through the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedDocument {
    /// Original filename as uploaded.
    pub filename: String,
    /// Category the document was sorted into.
    #[serde(rename = "type")]
    pub classified_type: DocumentType,
    pub status: ProcessingStatus,
    /// Extracted client name, `UNKNOWN_CLIENT` if none was found.
    /// Absent for failed documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    /// Standardized filename. Absent for failed documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_filename: Option<String>,
    pub details: String,
    pub timestamp: DateTime<Utc>,
    /// Upload size in bytes.
    pub size: u64,
}

impl ProcessedDocument {
    /// Build the ERROR record for an upload whose processing failed.
    pub fn failed(filename: &str, size: u64, message: String) -> Self {
        Self {
            filename: filename.to_string(),
            classified_type: DocumentType::Error,
            status: ProcessingStatus::Failed,
            client_name: None,
            new_filename: None,
            details: message,
            timestamp: Utc::now(),
            size,
        }
    }

    pub fn is_error(&self) -> bool {
        self.classified_type == DocumentType::Error
    }

    /// Name to display for this document, preferring the generated one.
    pub fn display_name(&self) -> &str {
        self.new_filename.as_deref().unwrap_or(&self.filename)
    }

    pub fn display_size(&self) -> String {
        format_size(self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_type_round_trip_names() {
        for ty in [
            DocumentType::Rdl,
            DocumentType::Rcs,
            DocumentType::Review,
            DocumentType::Error,
        ] {
            assert_eq!(DocumentType::from_str(ty.as_str()), Some(ty));
        }
        assert_eq!(DocumentType::from_str("rdl"), Some(DocumentType::Rdl));
        assert_eq!(DocumentType::from_str("bogus"), None);
    }

    #[test]
    fn test_failed_record_has_no_derived_fields() {
        let doc = ProcessedDocument::failed("broken.pdf", 12, "boom".to_string());
        assert!(doc.is_error());
        assert_eq!(doc.status, ProcessingStatus::Failed);
        assert_eq!(doc.status.as_str(), "Processing failed");
        assert!(doc.client_name.is_none());
        assert_eq!(doc.display_name(), "broken.pdf");
    }

    #[test]
    fn test_serializes_with_wire_names() {
        let doc = ProcessedDocument {
            filename: "a_rdl.pdf".to_string(),
            classified_type: DocumentType::Rdl,
            status: ProcessingStatus::Processed,
            client_name: Some("DAVID BROWN".to_string()),
            new_filename: Some("DAVID_BROWN_RDL.pdf".to_string()),
            details: "ok".to_string(),
            timestamp: Utc::now(),
            size: 2048,
        };
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["type"], "RDL");
        assert_eq!(json["status"], "PROCESSED");
        assert_eq!(json["clientName"], "DAVID BROWN");
        assert_eq!(json["newFilename"], "DAVID_BROWN_RDL.pdf");
    }
}
