//! Standardized output filenames.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::DocumentType;

static DISALLOWED_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\s-]").unwrap());

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Build `<CLEAN_NAME>_<TYPE>.pdf` from an extracted client name.
///
/// Characters other than ASCII word characters, whitespace and hyphens are
/// dropped, then each whitespace run becomes a single underscore.
pub fn generate_filename(client_name: &str, doc_type: DocumentType) -> String {
    let stripped = DISALLOWED_CHARS.replace_all(client_name, "");
    let clean = WHITESPACE_RUN.replace_all(&stripped, "_");
    format!("{}_{}.pdf", clean, doc_type.as_str())
}
