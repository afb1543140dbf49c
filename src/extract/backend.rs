//! Extraction backend abstraction.

use thiserror::Error;

use crate::models::UploadedFile;

/// Errors that can occur during text extraction.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("No file content available for {0}")]
    MissingContent(String),

    #[error("External tool not found: {0}")]
    ToolNotFound(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Method used to obtain the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMethod {
    /// Text fabricated from filename keywords.
    Synthetic,
    /// Direct text extraction from PDF.
    PdfToText,
    /// OCR using Tesseract.
    TesseractOcr,
    /// Plain text read as-is.
    Direct,
    /// Nothing to extract for this MIME type.
    None,
}

/// Result of text extraction.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Extracted text content.
    pub text: String,
    /// The document is encrypted and its text could not be read.
    pub encrypted: bool,
    pub method: ExtractionMethod,
}

impl Extraction {
    pub fn text(text: impl Into<String>, method: ExtractionMethod) -> Self {
        Self {
            text: text.into(),
            encrypted: false,
            method,
        }
    }

    pub fn empty() -> Self {
        Self::text(String::new(), ExtractionMethod::None)
    }

    pub fn encrypted() -> Self {
        Self {
            text: String::new(),
            encrypted: true,
            method: ExtractionMethod::PdfToText,
        }
    }
}

/// Source of document text for the classification pipeline.
///
/// Implementations must be shareable across tasks; the pipeline itself
/// calls them strictly one file at a time.
pub trait TextExtractor: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &'static str;

    /// Extract text from an upload based on its MIME type.
    fn extract(&self, file: &UploadedFile) -> Result<Extraction, ExtractionError>;
}

/// Available extraction backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractorKind {
    /// Filename-driven placeholder text.
    #[default]
    Synthetic,
    /// pdftotext/pdfinfo (Poppler) and Tesseract.
    Poppler,
}

impl ExtractorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Synthetic => "synthetic",
            Self::Poppler => "poppler",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "synthetic" | "demo" => Some(Self::Synthetic),
            "poppler" | "ocr" => Some(Self::Poppler),
            _ => None,
        }
    }
}
