//! Sequential batch runner for the classification pipeline.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;

use super::error::ClassificationFailure;
use crate::classify::{classify_document, extract_client_name, generate_filename, Classification};
use crate::extract::TextExtractor;
use crate::models::{ProcessedDocument, UploadedFile};

/// Progress events emitted while a batch runs.
#[derive(Debug, Clone)]
pub enum BatchEvent {
    /// Batch accepted.
    Started { total_files: usize },
    /// A file entered the pipeline.
    FileStarted {
        index: usize,
        filename: String,
    },
    /// A file was classified.
    FileCompleted {
        index: usize,
        document: ProcessedDocument,
    },
    /// A file failed and was recorded as ERROR.
    FileFailed {
        index: usize,
        filename: String,
        error: String,
    },
    /// All files handled.
    Finished { processed: usize, failed: usize },
}

/// Runs uploads through extraction, classification, client-name
/// extraction and renaming.
#[derive(Clone)]
pub struct Pipeline {
    extractor: Arc<dyn TextExtractor>,
    pacing: Duration,
}

impl Pipeline {
    pub fn new(extractor: Arc<dyn TextExtractor>) -> Self {
        Self {
            extractor,
            pacing: Duration::ZERO,
        }
    }

    /// Pause between consecutive files of a batch.
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn pacing(&self) -> Duration {
        self.pacing
    }

    pub fn extractor_name(&self) -> &'static str {
        self.extractor.name()
    }

    /// Process a single upload.
    pub fn process_file(&self, file: &UploadedFile) -> Result<ProcessedDocument, ClassificationFailure> {
        if file.name.trim().is_empty() {
            return Err(ClassificationFailure::InvalidInput(
                "file name is empty".to_string(),
            ));
        }

        let extraction = self.extractor.extract(file)?;
        tracing::debug!(
            "Extracted {} chars from {} via {:?}",
            extraction.text.len(),
            file.name,
            extraction.method
        );

        let classification = if extraction.encrypted {
            Classification::password_protected()
        } else {
            classify_document(&extraction.text, &file.name)
        };

        let client_name = extract_client_name(&extraction.text, classification.doc_type);
        let new_filename = generate_filename(&client_name, classification.doc_type);

        Ok(ProcessedDocument {
            filename: file.name.clone(),
            classified_type: classification.doc_type,
            status: classification.status,
            client_name: Some(client_name),
            new_filename: Some(new_filename),
            details: classification.details.to_string(),
            timestamp: Utc::now(),
            size: file.size,
        })
    }

    /// Process a single upload, downgrading any failure to an ERROR record.
    pub async fn process_or_record(&self, file: &UploadedFile) -> ProcessedDocument {
        match self.process(file).await {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!("Processing {} failed: {}", file.name, e);
                ProcessedDocument::failed(&file.name, file.size, e.to_string())
            }
        }
    }

    /// Process files one at a time, in order.
    ///
    /// Always returns one record per input file. A failing file becomes an
    /// ERROR record and never stops the rest of the batch.
    pub async fn process_batch(
        &self,
        files: &[UploadedFile],
        event_tx: Option<mpsc::Sender<BatchEvent>>,
    ) -> Vec<ProcessedDocument> {
        let emit = |event: BatchEvent| {
            let tx = event_tx.clone();
            async move {
                if let Some(tx) = tx {
                    let _ = tx.send(event).await;
                }
            }
        };

        emit(BatchEvent::Started {
            total_files: files.len(),
        })
        .await;

        let mut results = Vec::with_capacity(files.len());
        let mut failed = 0;

        for (index, file) in files.iter().enumerate() {
            if index > 0 && !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }

            emit(BatchEvent::FileStarted {
                index,
                filename: file.name.clone(),
            })
            .await;

            let doc = self.process_or_record(file).await;
            if doc.is_error() {
                failed += 1;
                emit(BatchEvent::FileFailed {
                    index,
                    filename: file.name.clone(),
                    error: doc.details.clone(),
                })
                .await;
            } else {
                emit(BatchEvent::FileCompleted {
                    index,
                    document: doc.clone(),
                })
                .await;
            }
            results.push(doc);
        }

        tracing::info!(
            "Batch finished: {} files, {} failed",
            results.len(),
            failed
        );
        emit(BatchEvent::Finished {
            processed: results.len() - failed,
            failed,
        })
        .await;

        results
    }

    /// Process a single upload on the blocking pool.
    ///
    /// Extractors may shell out, so they stay off the async workers.
    pub async fn process(
        &self,
        file: &UploadedFile,
    ) -> Result<ProcessedDocument, ClassificationFailure> {
        let pipeline = self.clone();
        let file = file.clone();
        tokio::task::spawn_blocking(move || pipeline.process_file(&file))
            .await
            .map_err(|e| ClassificationFailure::Aborted(e.to_string()))?
    }
}
