//! Text extraction from real files using pdftotext, pdfinfo and Tesseract.

use std::path::Path;
use std::process::Command;

use super::backend::{Extraction, ExtractionError, ExtractionMethod, TextExtractor};
use crate::models::UploadedFile;

/// Handle command output, extracting stdout on success or returning appropriate error.
fn handle_cmd_output(
    result: std::io::Result<std::process::Output>,
    tool_name: &str,
    error_prefix: &str,
) -> Result<String, ExtractionError> {
    match result {
        Ok(output) => {
            if output.status.success() {
                Ok(String::from_utf8_lossy(&output.stdout).to_string())
            } else {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(ExtractionError::ExtractionFailed(format!(
                    "{}: {}",
                    error_prefix,
                    stderr.trim()
                )))
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ExtractionError::ToolNotFound(tool_name.to_string()))
        }
        Err(e) => Err(ExtractionError::Io(e)),
    }
}

/// Check if a binary is available in PATH.
pub fn check_binary(name: &str) -> bool {
    which::which(name).is_ok()
}

/// Tesseract language used when none is configured.
pub const DEFAULT_OCR_LANGUAGE: &str = "eng";

/// Extractor that shells out to Poppler and Tesseract.
pub struct PopplerExtractor {
    /// Tesseract language setting.
    tesseract_lang: String,
}

impl Default for PopplerExtractor {
    fn default() -> Self {
        Self {
            tesseract_lang: DEFAULT_OCR_LANGUAGE.to_string(),
        }
    }
}

impl PopplerExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set Tesseract language.
    pub fn with_language(mut self, lang: &str) -> Self {
        self.tesseract_lang = lang.to_string();
        self
    }

    pub fn language(&self) -> &str {
        &self.tesseract_lang
    }

    /// Run pdftotext on a PDF file.
    fn run_pdftotext(&self, file_path: &Path) -> Result<String, ExtractionError> {
        let output = Command::new("pdftotext")
            .args(["-layout", "-enc", "UTF-8"])
            .arg(file_path)
            .arg("-") // Output to stdout
            .output();

        handle_cmd_output(output, "pdftotext (install poppler-utils)", "pdftotext failed")
    }

    /// Run Tesseract OCR on an image.
    fn run_tesseract(&self, image_path: &Path) -> Result<String, ExtractionError> {
        let output = Command::new("tesseract")
            .arg(image_path)
            .arg("stdout")
            .args(["-l", &self.tesseract_lang])
            .output();

        handle_cmd_output(output, "tesseract (install tesseract-ocr)", "tesseract failed")
    }

    /// Whether pdfinfo reports the PDF as encrypted.
    pub fn is_encrypted(&self, file_path: &Path) -> Result<bool, ExtractionError> {
        let output = Command::new("pdfinfo").arg(file_path).output();

        let stdout = match handle_cmd_output(output, "pdfinfo (install poppler-utils)", "pdfinfo failed") {
            Ok(stdout) => stdout,
            // pdfinfo exits non-zero when it cannot open an encrypted file.
            Err(ExtractionError::ExtractionFailed(msg)) if msg.contains("Incorrect password") => {
                return Ok(true)
            }
            Err(e) => return Err(e),
        };

        Ok(parse_encrypted_flag(&stdout))
    }

    /// Check if required tools are available.
    pub fn check_tools() -> Vec<(String, bool)> {
        ["pdftotext", "pdfinfo", "tesseract"]
            .iter()
            .map(|tool| (tool.to_string(), check_binary(tool)))
            .collect()
    }
}

/// Read the `Encrypted:` line of pdfinfo output.
fn parse_encrypted_flag(pdfinfo_output: &str) -> bool {
    pdfinfo_output
        .lines()
        .find(|line| line.starts_with("Encrypted:"))
        .and_then(|line| line.split_whitespace().nth(1))
        .map(|value| value.eq_ignore_ascii_case("yes"))
        .unwrap_or(false)
}

impl TextExtractor for PopplerExtractor {
    fn name(&self) -> &'static str {
        "poppler"
    }

    fn extract(&self, file: &UploadedFile) -> Result<Extraction, ExtractionError> {
        let path = file
            .path
            .as_deref()
            .ok_or_else(|| ExtractionError::MissingContent(file.name.clone()))?;

        if file.is_pdf() {
            if self.is_encrypted(path)? {
                tracing::debug!("{} is encrypted, skipping text extraction", file.name);
                return Ok(Extraction::encrypted());
            }
            let text = self.run_pdftotext(path)?;
            Ok(Extraction::text(text, ExtractionMethod::PdfToText))
        } else if file.is_image() {
            let text = self.run_tesseract(path)?;
            Ok(Extraction::text(text, ExtractionMethod::TesseractOcr))
        } else if file.mime_type == "text/plain" {
            let text = std::fs::read_to_string(path)?;
            Ok(Extraction::text(text, ExtractionMethod::Direct))
        } else {
            Ok(Extraction::empty())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_tools() {
        let tools = PopplerExtractor::check_tools();
        assert_eq!(tools.len(), 3);
        for (tool, available) in tools {
            println!("{}: {}", tool, if available { "found" } else { "missing" });
        }
    }

    #[test]
    fn test_language_defaults_to_english() {
        assert_eq!(PopplerExtractor::new().language(), "eng");
        assert_eq!(PopplerExtractor::new().with_language("deu+eng").language(), "deu+eng");
    }

    #[test]
    fn test_parse_encrypted_flag() {
        let output = "Producer:       Acrobat\nEncrypted:      yes (print:yes copy:no)\nPages:          2\n";
        assert!(parse_encrypted_flag(output));
        assert!(!parse_encrypted_flag("Encrypted:      no\n"));
        assert!(!parse_encrypted_flag("Pages: 1\n"));
    }

    #[test]
    fn test_requires_local_path() {
        let extractor = PopplerExtractor::new();
        let upload = UploadedFile::new("remote.pdf", "application/pdf", 10);
        assert!(matches!(
            extractor.extract(&upload),
            Err(ExtractionError::MissingContent(_))
        ));
    }

    #[test]
    fn test_reads_plain_text_directly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memo.txt");
        std::fs::write(&path, "TM-RCS-2023-0042").unwrap();

        let upload = UploadedFile::from_path(&path).unwrap();
        let extraction = PopplerExtractor::new().extract(&upload).unwrap();
        assert_eq!(extraction.text, "TM-RCS-2023-0042");
        assert_eq!(extraction.method, ExtractionMethod::Direct);
    }
}
