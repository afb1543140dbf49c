//! MIME type detection for local uploads.

use std::path::Path;

/// Fallback when neither content nor extension identify the file.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Detect a file's MIME type.
///
/// Magic bytes win over the extension, so a PDF saved as `.bin` is still
/// treated as a PDF. Unreadable or unrecognised files fall back to the
/// extension guess, then to `application/octet-stream`.
pub fn detect_mime_type(path: &Path) -> String {
    match infer::get_from_path(path) {
        Ok(Some(kind)) => return kind.mime_type().to_string(),
        Ok(None) => {}
        Err(e) => tracing::debug!("Could not sniff {}: {}", path.display(), e),
    }

    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(OCTET_STREAM)
        .to_string()
}
