//! Per-file processing failures.

use thiserror::Error;

use crate::extract::ExtractionError;

/// Failure of any pipeline step for a single upload.
///
/// Caught at file granularity: the batch runner turns it into an ERROR
/// record and moves on to the next file.
#[derive(Debug, Error)]
pub enum ClassificationFailure {
    #[error("Invalid upload: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("Processing task aborted: {0}")]
    Aborted(String),
}
