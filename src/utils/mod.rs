//! Shared utility functions.
//!
//! - `format`: Human-readable formatting (sizes, truncation)
//! - `mime`: MIME type detection for local files

mod format;
mod mime;

pub use format::{format_size, truncate};
pub use mime::{detect_mime_type, OCTET_STREAM};
