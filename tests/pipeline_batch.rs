//! End-to-end tests for batch classification and the portal/dashboard flow.

use std::sync::Arc;

use regex::Regex;

use docsorter::email::EmailClient;
use docsorter::extract::{
    Extraction, ExtractionError, ExtractionMethod, FixedSource, SyntheticExtractor, TextExtractor,
};
use docsorter::models::{DocumentType, PortalStatus, ProcessingStatus, UploadedFile};
use docsorter::pipeline::{BatchEvent, Pipeline, SessionStats};
use docsorter::services::{AdminDashboard, ClientPortal, QueueKind};
use docsorter::storage::{MemoryStore, Records};

/// Synthetic extractor that fails for one file name.
struct FlakyExtractor {
    inner: SyntheticExtractor,
    broken: &'static str,
}

impl TextExtractor for FlakyExtractor {
    fn name(&self) -> &'static str {
        "flaky"
    }

    fn extract(&self, file: &UploadedFile) -> Result<Extraction, ExtractionError> {
        if file.name == self.broken {
            return Err(ExtractionError::ExtractionFailed("corrupt xref table".to_string()));
        }
        self.inner.extract(file)
    }
}

/// Extractor that returns the same text for every file.
struct StaticText(&'static str);

impl TextExtractor for StaticText {
    fn name(&self) -> &'static str {
        "static"
    }

    fn extract(&self, _file: &UploadedFile) -> Result<Extraction, ExtractionError> {
        Ok(Extraction::text(self.0, ExtractionMethod::Direct))
    }
}

fn fixed_pipeline(index: usize) -> Pipeline {
    Pipeline::new(Arc::new(SyntheticExtractor::new(Arc::new(FixedSource::new(
        index,
    )))))
}

fn pdf(name: &str) -> UploadedFile {
    UploadedFile::new(name, "application/pdf", 2048)
}

#[tokio::test]
async fn test_failure_in_middle_of_batch_is_isolated() {
    let pipeline = Pipeline::new(Arc::new(FlakyExtractor {
        inner: SyntheticExtractor::new(Arc::new(FixedSource::new(0))),
        broken: "broken.pdf",
    }));
    let files = vec![pdf("rating_rdl.pdf"), pdf("broken.pdf"), pdf("auth_form.pdf")];

    let results = pipeline.process_batch(&files, None).await;

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].classified_type, DocumentType::Rdl);
    assert_eq!(results[0].new_filename.as_deref(), Some("ARIANA_ATKINS_RDL.pdf"));

    assert_eq!(results[1].classified_type, DocumentType::Error);
    assert_eq!(results[1].status, ProcessingStatus::Failed);
    assert!(results[1].details.contains("corrupt xref table"));
    assert!(results[1].new_filename.is_none());

    assert_eq!(results[2].classified_type, DocumentType::Rcs);
    assert_eq!(results[2].new_filename.as_deref(), Some("John_A_Smith_RCS.pdf"));

    let stats = SessionStats::from_documents(&results);
    assert_eq!((stats.total, stats.rdl, stats.rcs, stats.review), (3, 1, 1, 1));
}

#[tokio::test]
async fn test_batch_preserves_input_order_and_emits_events() {
    let pipeline = fixed_pipeline(1);
    let files = vec![
        pdf("notes.pdf"),
        pdf("rating_decision.pdf"),
        pdf("Scan_Protected.pdf"),
    ];
    let (tx, mut rx) = tokio::sync::mpsc::channel(32);

    let results = pipeline.process_batch(&files, Some(tx)).await;

    let names: Vec<&str> = results.iter().map(|d| d.filename.as_str()).collect();
    assert_eq!(names, vec!["notes.pdf", "rating_decision.pdf", "Scan_Protected.pdf"]);

    let mut started = Vec::new();
    let mut finished = None;
    while let Some(event) = rx.recv().await {
        match event {
            BatchEvent::FileStarted { index, .. } => started.push(index),
            BatchEvent::Finished { processed, failed } => finished = Some((processed, failed)),
            _ => {}
        }
    }
    assert_eq!(started, vec![0, 1, 2]);
    assert_eq!(finished, Some((3, 0)));
}

#[tokio::test]
async fn test_rdl_names_match_convention() {
    let convention = Regex::new(r"^[A-Za-z0-9_]+_RDL\.pdf$").unwrap();

    for index in 0..5 {
        let doc = fixed_pipeline(index)
            .process(&pdf("veteran_rdl.pdf"))
            .await
            .unwrap();
        let name = doc.new_filename.unwrap();
        assert!(convention.is_match(&name), "{} does not match", name);
    }
}

#[tokio::test]
async fn test_filename_keywords_drive_classification() {
    let pipeline = fixed_pipeline(0);

    let rcs = pipeline.process(&pdf("client_rcs.pdf")).await.unwrap();
    assert_eq!(rcs.classified_type, DocumentType::Rcs);

    let protected = pipeline.process(&pdf("protected_rdl.pdf")).await.unwrap();
    assert_eq!(protected.status, ProcessingStatus::PasswordProtected);
    assert_eq!(protected.new_filename.as_deref(), Some("UNKNOWN_CLIENT_REVIEW.pdf"));

    let license = pipeline.process(&pdf("drivers_license.pdf")).await.unwrap();
    assert_eq!(license.status, ProcessingStatus::Unwanted);

    let unknown = pipeline.process(&pdf("misc.pdf")).await.unwrap();
    assert_eq!(unknown.status, ProcessingStatus::Unknown);
    assert_eq!(unknown.client_name.as_deref(), Some("UNKNOWN_CLIENT"));
}

#[tokio::test]
async fn test_unwanted_marker_beats_rating_letter() {
    let pipeline = Pipeline::new(Arc::new(StaticText(
        "DEPARTMENT OF VETERANS AFFAIRS\nRating Decision\nDRIVER'S LICENSE enclosed",
    )));

    let doc = pipeline.process(&pdf("rating_rdl.pdf")).await.unwrap();
    assert_eq!(doc.classified_type, DocumentType::Review);
    assert_eq!(doc.status, ProcessingStatus::Unwanted);
}

#[tokio::test]
async fn test_portal_uploads_feed_admin_queue() {
    let records = Records::new(Arc::new(MemoryStore::new()));
    let portal = ClientPortal::new("client@demo.com", fixed_pipeline(2), records.clone());

    let outcomes = portal
        .upload(&[pdf("rating_rdl.pdf"), pdf("locked_protected.pdf")])
        .await
        .unwrap();
    assert_eq!(outcomes.len(), 2);

    let docs = portal.documents().await.unwrap();
    assert_eq!(docs[0].status, PortalStatus::Review);
    assert_eq!(docs[1].processed_name.as_deref(), Some("SARAH_WILLIAMS_RDL.pdf"));

    let email = EmailClient::new("http://127.0.0.1:9").unwrap();
    let dashboard = AdminDashboard::new(records, email, "admin@demo.com");

    let queue = dashboard.processing_queue().await.unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].kind, QueueKind::Password);
    assert_eq!(queue[0].client_name, "Demo Client");

    let stats = dashboard.stats().await.unwrap();
    assert_eq!(stats.total_documents, 2);
    assert_eq!(stats.processed_docs, 1);
    assert_eq!(stats.review_docs, 1);

    assert!(dashboard.resolve(&queue[0].id).await.unwrap());
    assert!(dashboard.processing_queue().await.unwrap().is_empty());
    assert_eq!(dashboard.stats().await.unwrap().review_docs, 0);
}
