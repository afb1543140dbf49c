//! Synthetic text extraction.
//!
//! Stands in for PDF parsing and OCR: the text is fabricated from keywords
//! in the lower-cased filename. Names and numbers come from an injectable
//! [`SampleSource`] so outputs can be pinned.

use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::backend::{Extraction, ExtractionError, ExtractionMethod, TextExtractor};
use crate::models::UploadedFile;

/// Names used on fabricated rating decision letters.
pub const RDL_SAMPLE_NAMES: [&str; 5] = [
    "ARIANA ATKINS",
    "MICHAEL JOHNSON",
    "SARAH WILLIAMS",
    "DAVID BROWN",
    "LISA GARCIA",
];

/// Names used on fabricated authorization forms.
pub const RCS_SAMPLE_NAMES: [&str; 5] = [
    "John A. Smith",
    "Mary Johnson",
    "Robert Davis",
    "Jennifer Wilson",
    "William Martinez",
];

/// Text returned for PDFs whose name matches no keyword.
pub const PLACEHOLDER_PDF_TEXT: &str = "Sample document text for processing...";

/// Text returned for every image upload.
pub const PLACEHOLDER_OCR_TEXT: &str = "OCR extracted text from image...";

const LICENSE_TEXT: &str = "DRIVER'S LICENSE\n\
State of California\n\
Name: Test User\n\
License Number: D1234567";

/// Random draws used when fabricating text.
pub trait SampleSource: Send + Sync {
    /// Pick an index in `0..len`. `len` is never zero.
    fn pick(&self, len: usize) -> usize;

    /// Draw an integer in `low..high`.
    fn number(&self, low: u32, high: u32) -> u32;
}

/// `StdRng`-backed sample source.
pub struct SeededSource {
    rng: Mutex<StdRng>,
}

impl SeededSource {
    /// Deterministic source: equal seeds produce equal text.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }
}

impl SampleSource for SeededSource {
    fn pick(&self, len: usize) -> usize {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.gen_range(0..len)
    }

    fn number(&self, low: u32, high: u32) -> u32 {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.gen_range(low..high)
    }
}

/// Sample source that always returns the same draws.
#[derive(Debug, Clone, Copy)]
pub struct FixedSource {
    pub index: usize,
    pub number: u32,
}

impl FixedSource {
    pub fn new(index: usize) -> Self {
        Self { index, number: 0 }
    }
}

impl SampleSource for FixedSource {
    fn pick(&self, len: usize) -> usize {
        self.index % len
    }

    fn number(&self, low: u32, high: u32) -> u32 {
        self.number.clamp(low, high.saturating_sub(1))
    }
}

/// Filename-keyword text fabricator.
#[derive(Clone)]
pub struct SyntheticExtractor {
    samples: Arc<dyn SampleSource>,
}

impl Default for SyntheticExtractor {
    fn default() -> Self {
        Self::new(Arc::new(SeededSource::from_entropy()))
    }
}

impl SyntheticExtractor {
    pub fn new(samples: Arc<dyn SampleSource>) -> Self {
        Self { samples }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(Arc::new(SeededSource::new(seed)))
    }

    /// Fabricate PDF text from keywords in the filename.
    fn simulate_pdf(&self, filename: &str) -> String {
        let lower = filename.to_lowercase();
        let today = chrono::Local::now().format("%-m/%-d/%Y");

        if lower.contains("rdl") || lower.contains("rating") {
            let name = RDL_SAMPLE_NAMES[self.samples.pick(RDL_SAMPLE_NAMES.len())];
            format!(
                "DEPARTMENT OF VETERANS AFFAIRS\n\
                 Veterans Benefits Administration\n\
                 Regional Office\n\
                 {name}\n\
                 VA File Number\n\
                 {} {} {}\n\
                 Rating Decision\n\
                 {today}",
                self.samples.number(100, 1000),
                self.samples.number(100, 1000),
                self.samples.number(1000, 10000),
            )
        } else if lower.contains("rcs") || lower.contains("auth") {
            let name = RCS_SAMPLE_NAMES[self.samples.pick(RCS_SAMPLE_NAMES.len())];
            format!(
                "TM CLIENT AUTHORIZATION FORM\n\
                 Document ID: TM-RCS-2023-{}\n\
                 Client: {name} (ID: TM-{}-2023)\n\
                 Date Issued: {today}",
                self.samples.number(0, 9999),
                self.samples.number(0, 9999),
            )
        } else if lower.contains("license") || lower.contains("passport") {
            LICENSE_TEXT.to_string()
        } else {
            PLACEHOLDER_PDF_TEXT.to_string()
        }
    }
}

impl TextExtractor for SyntheticExtractor {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    fn extract(&self, file: &UploadedFile) -> Result<Extraction, ExtractionError> {
        if file.is_pdf() {
            Ok(Extraction::text(
                self.simulate_pdf(&file.name),
                ExtractionMethod::Synthetic,
            ))
        } else if file.is_image() {
            Ok(Extraction::text(
                PLACEHOLDER_OCR_TEXT,
                ExtractionMethod::Synthetic,
            ))
        } else {
            Ok(Extraction::empty())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf(name: &str) -> UploadedFile {
        UploadedFile::new(name, "application/pdf", 1024)
    }

    fn extract_text(extractor: &SyntheticExtractor, file: &UploadedFile) -> String {
        extractor.extract(file).unwrap().text
    }

    #[test]
    fn test_rating_letter_uses_picked_name() {
        let extractor = SyntheticExtractor::new(Arc::new(FixedSource::new(3)));
        let text = extract_text(&extractor, &pdf("My_Rating_Letter.pdf"));

        assert!(text.starts_with("DEPARTMENT OF VETERANS AFFAIRS"));
        assert!(text.contains("\nDAVID BROWN\nVA File Number\n"));
        assert!(text.contains("Rating Decision"));
    }

    #[test]
    fn test_authorization_form_uses_picked_name() {
        let extractor = SyntheticExtractor::new(Arc::new(FixedSource::new(1)));
        let text = extract_text(&extractor, &pdf("client_AUTH.pdf"));

        assert!(text.starts_with("TM CLIENT AUTHORIZATION FORM"));
        assert!(text.contains("Client: Mary Johnson (ID: TM-"));
    }

    #[test]
    fn test_license_and_passport_keywords() {
        let extractor = SyntheticExtractor::seeded(7);
        assert!(extract_text(&extractor, &pdf("license.pdf")).starts_with("DRIVER'S LICENSE"));
        assert!(extract_text(&extractor, &pdf("passport_scan.pdf")).starts_with("DRIVER'S LICENSE"));
    }

    #[test]
    fn test_placeholders_by_mime_type() {
        let extractor = SyntheticExtractor::seeded(7);
        assert_eq!(extract_text(&extractor, &pdf("invoice.pdf")), PLACEHOLDER_PDF_TEXT);
        assert_eq!(
            extract_text(&extractor, &UploadedFile::new("rdl.png", "image/png", 1)),
            PLACEHOLDER_OCR_TEXT
        );
        assert_eq!(
            extract_text(&extractor, &UploadedFile::new("rdl.txt", "text/plain", 1)),
            ""
        );
    }

    #[test]
    fn test_equal_seeds_pick_equal_names() {
        let first = SyntheticExtractor::seeded(42);
        let second = SyntheticExtractor::seeded(42);
        for _ in 0..5 {
            let a = extract_text(&first, &pdf("rdl.pdf"));
            let b = extract_text(&second, &pdf("rdl.pdf"));
            // The trailing date line is the only non-seeded part.
            assert_eq!(a.lines().take(7).collect::<Vec<_>>(), b.lines().take(7).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_fixed_source_clamps_numbers() {
        let source = FixedSource { index: 0, number: 5 };
        assert_eq!(source.number(100, 1000), 100);
        assert_eq!(source.number(0, 3), 2);
        assert_eq!(source.pick(5), 0);
    }
}
