//! Uploaded file descriptors.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::utils::detect_mime_type;

/// A file submitted for processing.
///
/// Only the name, MIME type and size drive classification. `path` is set
/// when the upload came from the local filesystem, so extractors that read
/// real content can find it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub name: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub size: u64,
    #[serde(skip)]
    pub path: Option<PathBuf>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size,
            path: None,
        }
    }

    /// Describe a local file, detecting its MIME type from content and extension.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            name,
            mime_type: detect_mime_type(path),
            size: metadata.len(),
            path: Some(path.to_path_buf()),
        })
    }

    /// Override the detected MIME type.
    pub fn with_mime_type(mut self, mime_type: &str) -> Self {
        self.mime_type = mime_type.to_string();
        self
    }

    pub fn is_pdf(&self) -> bool {
        self.mime_type == "application/pdf"
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path_reads_size_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rating_rdl.pdf");
        std::fs::write(&path, b"%PDF-1.4\n%fake\n").unwrap();

        let upload = UploadedFile::from_path(&path).unwrap();
        assert_eq!(upload.name, "rating_rdl.pdf");
        assert_eq!(upload.size, 15);
        assert!(upload.is_pdf());
        assert_eq!(upload.path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_kind_checks() {
        assert!(UploadedFile::new("scan.png", "image/png", 1).is_image());
        assert!(!UploadedFile::new("notes.txt", "text/plain", 1).is_pdf());
    }
}
