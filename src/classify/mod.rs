//! Document classification.
//!
//! Three pure steps over extracted text:
//! - [`classify_document`] picks a category by keyword rules
//! - [`extract_client_name`] pulls the client name for that category
//! - [`generate_filename`] derives the standardized output name

mod client_info;
mod naming;
mod rules;

pub use client_info::extract_client_name;
pub use naming::generate_filename;
pub use rules::{classify_document, Classification, UNWANTED_PATTERNS};
