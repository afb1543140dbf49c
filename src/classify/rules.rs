//! Keyword rules that sort extracted text into document categories.

use serde::Serialize;

use crate::models::{DocumentType, ProcessingStatus};

/// Text markers of identity documents we do not accept.
pub const UNWANTED_PATTERNS: [&str; 3] = ["DRIVER'S LICENSE", "PASSPORT", "BIRTH CERTIFICATE"];

/// Outcome of classifying one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub doc_type: DocumentType,
    pub status: ProcessingStatus,
    pub details: &'static str,
}

impl Classification {
    pub fn password_protected() -> Self {
        Self {
            doc_type: DocumentType::Review,
            status: ProcessingStatus::PasswordProtected,
            details: "Document appears to be password protected",
        }
    }

    fn unwanted() -> Self {
        Self {
            doc_type: DocumentType::Review,
            status: ProcessingStatus::Unwanted,
            details: "Document marked as unwanted (ID document)",
        }
    }

    fn rating_decision() -> Self {
        Self {
            doc_type: DocumentType::Rdl,
            status: ProcessingStatus::Processed,
            details: "Rating Decision Letter identified and processed",
        }
    }

    fn client_services() -> Self {
        Self {
            doc_type: DocumentType::Rcs,
            status: ProcessingStatus::Processed,
            details: "Records/Client Services document identified and processed",
        }
    }

    fn unknown() -> Self {
        Self {
            doc_type: DocumentType::Review,
            status: ProcessingStatus::Unknown,
            details: "Document type could not be determined automatically",
        }
    }
}

/// Classify a document from its text and original filename.
///
/// Rules are tested in priority order and the first match wins:
/// 1. filename contains "protected"
/// 2. text carries an unwanted identity-document marker
/// 3. rating decision letter markers
/// 4. client authorization markers
/// 5. anything else needs review
pub fn classify_document(text: &str, filename: &str) -> Classification {
    if filename.to_lowercase().contains("protected") {
        return Classification::password_protected();
    }

    let text_upper = text.to_uppercase();

    if UNWANTED_PATTERNS
        .iter()
        .any(|pattern| text_upper.contains(pattern))
    {
        return Classification::unwanted();
    }

    if text_upper.contains("DEPARTMENT OF VETERANS AFFAIRS")
        && text_upper.contains("RATING DECISION")
    {
        return Classification::rating_decision();
    }

    if text_upper.contains("TM CLIENT AUTHORIZATION") || text_upper.contains("TM-RCS-") {
        return Classification::client_services();
    }

    Classification::unknown()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RDL_TEXT: &str = "DEPARTMENT OF VETERANS AFFAIRS\nRegional Office\nRating Decision";

    #[test]
    fn test_protected_filename_wins_over_content() {
        let result = classify_document(RDL_TEXT, "Scan_PROTECTED_rdl.pdf");
        assert_eq!(result.doc_type, DocumentType::Review);
        assert_eq!(result.status, ProcessingStatus::PasswordProtected);
    }

    #[test]
    fn test_unwanted_precedes_type_detection() {
        let text = format!("{}\nDriver's License attached", RDL_TEXT);
        let result = classify_document(&text, "rating_rdl.pdf");
        assert_eq!(result.status, ProcessingStatus::Unwanted);

        let result = classify_document("TM-RCS-2023-1 PASSPORT copy", "auth.pdf");
        assert_eq!(result.status, ProcessingStatus::Unwanted);

        let result = classify_document("birth certificate", "x.pdf");
        assert_eq!(result.status, ProcessingStatus::Unwanted);
    }

    #[test]
    fn test_rdl_needs_both_markers() {
        assert_eq!(classify_document(RDL_TEXT, "a.pdf").doc_type, DocumentType::Rdl);
        assert_eq!(
            classify_document("Department of Veterans Affairs", "a.pdf").status,
            ProcessingStatus::Unknown
        );
        assert_eq!(
            classify_document("rating decision", "a.pdf").status,
            ProcessingStatus::Unknown
        );
    }

    #[test]
    fn test_rcs_markers_are_case_insensitive() {
        let result = classify_document("tm client authorization form", "a.pdf");
        assert_eq!(result.doc_type, DocumentType::Rcs);
        assert_eq!(result.status, ProcessingStatus::Processed);
        assert_eq!(classify_document("id tm-rcs-2023-9", "a.pdf").doc_type, DocumentType::Rcs);
    }

    #[test]
    fn test_fallback_is_unknown_review() {
        let result = classify_document("", "notes.pdf");
        assert_eq!(result.doc_type, DocumentType::Review);
        assert_eq!(result.status, ProcessingStatus::Unknown);
        assert_eq!(
            result.details,
            "Document type could not be determined automatically"
        );
    }
}
