//! Session counters and folder views over processed documents.

use serde::Serialize;

use crate::models::{DocumentType, PortalDocument, ProcessedDocument};

/// Counts shown above the results list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub total: usize,
    pub rdl: usize,
    pub rcs: usize,
    /// REVIEW and ERROR documents together.
    pub review: usize,
}

impl SessionStats {
    pub fn from_documents(docs: &[ProcessedDocument]) -> Self {
        docs.iter().fold(Self::default(), |mut stats, doc| {
            stats.total += 1;
            match doc.classified_type {
                DocumentType::Rdl => stats.rdl += 1,
                DocumentType::Rcs => stats.rcs += 1,
                DocumentType::Review | DocumentType::Error => stats.review += 1,
            }
            stats
        })
    }
}

/// Folder tabs for browsing documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Folder {
    #[default]
    All,
    Rdl,
    Rcs,
    Review,
}

impl Folder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Rdl => "rdl",
            Self::Rcs => "rcs",
            Self::Review => "review",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "all" => Some(Self::All),
            "rdl" => Some(Self::Rdl),
            "rcs" => Some(Self::Rcs),
            "review" => Some(Self::Review),
            _ => None,
        }
    }

    pub fn contains(&self, doc: &ProcessedDocument) -> bool {
        match self {
            Self::All => true,
            Self::Rdl => doc.classified_type == DocumentType::Rdl,
            Self::Rcs => doc.classified_type == DocumentType::Rcs,
            Self::Review => matches!(
                doc.classified_type,
                DocumentType::Review | DocumentType::Error
            ),
        }
    }

    /// Portal documents are sorted by their generated name, since only
    /// that carries the category.
    pub fn contains_portal(&self, doc: &PortalDocument) -> bool {
        match self {
            Self::All => true,
            Self::Rdl => doc.processed_as(DocumentType::Rdl),
            Self::Rcs => doc.processed_as(DocumentType::Rcs),
            Self::Review => doc.status.needs_attention(),
        }
    }
}

/// Documents belonging to a folder, in their original order.
pub fn filter_documents(docs: &[ProcessedDocument], folder: Folder) -> Vec<&ProcessedDocument> {
    docs.iter().filter(|doc| folder.contains(doc)).collect()
}
