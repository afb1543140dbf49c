//! Text acquisition for uploaded documents.
//!
//! Two backends implement [`TextExtractor`]:
//! - **Synthetic** (default): fabricates text from filename keywords, with
//!   an injectable random source for names and numbers
//! - **Poppler**: pdftotext/pdfinfo for PDFs and Tesseract for images,
//!   including encrypted-PDF detection

mod backend;
mod poppler;
mod synthetic;

use std::sync::Arc;

pub use backend::{Extraction, ExtractionError, ExtractionMethod, ExtractorKind, TextExtractor};
pub use poppler::{check_binary, PopplerExtractor, DEFAULT_OCR_LANGUAGE};
pub use synthetic::{
    FixedSource, SampleSource, SeededSource, SyntheticExtractor, PLACEHOLDER_OCR_TEXT,
    PLACEHOLDER_PDF_TEXT, RCS_SAMPLE_NAMES, RDL_SAMPLE_NAMES,
};

/// Build an extractor of the given kind.
///
/// `seed` pins the synthetic extractor's random draws; it is ignored by
/// the Poppler backend.
pub fn build_extractor(
    kind: ExtractorKind,
    seed: Option<u64>,
    ocr_language: &str,
) -> Arc<dyn TextExtractor> {
    match kind {
        ExtractorKind::Synthetic => match seed {
            Some(seed) => Arc::new(SyntheticExtractor::seeded(seed)),
            None => Arc::new(SyntheticExtractor::default()),
        },
        ExtractorKind::Poppler => Arc::new(PopplerExtractor::new().with_language(ocr_language)),
    }
}
