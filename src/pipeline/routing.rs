//! Copy processed inputs into the sorted output tree.
//!
//! Layout under the output directory:
//! - `processed/RDL/<new name>` and `processed/RCS/<new name>`
//! - `processed/REVIEW_NEEDED/<REASON>_<original name>` for anything a
//!   person has to look at
//!
//! Inputs are copied, never moved. Failed documents are not routed.

use std::path::{Path, PathBuf};

use crate::models::{
    DocumentType, ProcessedDocument, ProcessingStatus, UploadedFile, UNKNOWN_CLIENT,
};

pub const PROCESSED_DIR: &str = "processed";
pub const REVIEW_NEEDED_DIR: &str = "REVIEW_NEEDED";

/// Where one processed document belongs, relative to `processed/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Sorted into its category folder under the generated name.
    Sorted { folder: DocumentType, filename: String },
    /// Held for review, prefixed with the reason.
    ReviewNeeded { reason: &'static str, filename: String },
}

impl Destination {
    /// Decide where a document goes. `None` for failed documents.
    pub fn for_document(doc: &ProcessedDocument) -> Option<Self> {
        let review = |reason: &'static str| {
            Some(Self::ReviewNeeded {
                reason,
                filename: doc.filename.clone(),
            })
        };

        match doc.status {
            ProcessingStatus::Failed => None,
            ProcessingStatus::PasswordProtected => review("PASSWORD_PROTECTED"),
            ProcessingStatus::Unwanted => review("UNWANTED"),
            ProcessingStatus::Unknown => review("UNKNOWN"),
            ProcessingStatus::Processed => {
                let has_client = doc
                    .client_name
                    .as_deref()
                    .is_some_and(|name| name != UNKNOWN_CLIENT);
                match (doc.classified_type, doc.new_filename.as_deref()) {
                    (DocumentType::Rdl | DocumentType::Rcs, Some(name)) if has_client => {
                        Some(Self::Sorted {
                            folder: doc.classified_type,
                            filename: name.to_string(),
                        })
                    }
                    _ => review("NO_CLIENT_INFO"),
                }
            }
        }
    }

    /// Path relative to the `processed/` directory.
    pub fn relative_path(&self) -> PathBuf {
        match self {
            Self::Sorted { folder, filename } => Path::new(folder.as_str()).join(filename),
            Self::ReviewNeeded { reason, filename } => {
                Path::new(REVIEW_NEEDED_DIR).join(format!("{}_{}", reason, filename))
            }
        }
    }
}

/// One input copied into the output tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedFile {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Create `processed/` and its category folders.
pub fn setup_directories(output_dir: &Path) -> std::io::Result<PathBuf> {
    let processed = output_dir.join(PROCESSED_DIR);
    for folder in [
        DocumentType::Rdl.as_str(),
        DocumentType::Rcs.as_str(),
        REVIEW_NEEDED_DIR,
    ] {
        std::fs::create_dir_all(processed.join(folder))?;
    }
    Ok(processed)
}

/// Copy each local upload to where its result belongs.
///
/// `uploads` and `results` are paired by position, as returned by
/// [`Pipeline::process_batch`](super::Pipeline::process_batch). Uploads with
/// no local path and failed documents are skipped. A name already taken in
/// the destination folder gets a numeric suffix instead of being overwritten.
pub fn route_processed(
    output_dir: &Path,
    uploads: &[UploadedFile],
    results: &[ProcessedDocument],
) -> std::io::Result<Vec<RoutedFile>> {
    let processed = setup_directories(output_dir)?;
    let mut routed = Vec::new();

    for (upload, doc) in uploads.iter().zip(results) {
        let Some(source) = upload.path.as_deref() else {
            continue;
        };
        let Some(destination) = Destination::for_document(doc) else {
            tracing::debug!("Not routing failed document {}", doc.filename);
            continue;
        };

        let target = free_path(processed.join(destination.relative_path()));
        std::fs::copy(source, &target)?;
        tracing::info!("Routed {} -> {}", source.display(), target.display());

        routed.push(RoutedFile {
            source: source.to_path_buf(),
            destination: target,
        });
    }

    Ok(routed)
}

/// First of `path`, `stem_2.ext`, `stem_3.ext`, ... that does not exist.
fn free_path(path: PathBuf) -> PathBuf {
    if !path.exists() {
        return path;
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    (2..)
        .map(|n| path.with_file_name(format!("{}_{}{}", stem, n, extension)))
        .find(|candidate| !candidate.exists())
        .unwrap_or(path)
}
