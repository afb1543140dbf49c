//! Process command: classify, rename and optionally route local files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use console::style;
use indicatif::ProgressBar;
use tokio::sync::mpsc;

use super::helpers::{batch_progress_bar, build_pipeline, open_records, type_label};
use crate::config::Settings;
use crate::models::{ProcessedDocument, UploadedFile};
use crate::pipeline::{route_processed, BatchEvent, Pipeline, RoutedFile, SessionStats};
use crate::services::{ClientPortal, UploadOutcome};
use crate::utils::truncate;

/// Flags of the process command.
pub struct ProcessOptions {
    pub client: Option<String>,
    pub mime: Option<String>,
    pub extractor: Option<String>,
    pub seed: Option<u64>,
    pub no_pacing: bool,
    pub json: bool,
    /// Copy inputs into a sorted tree under this directory.
    pub output: Option<PathBuf>,
}

/// Describe local files as uploads.
fn collect_uploads(paths: &[PathBuf], mime: Option<&str>) -> anyhow::Result<Vec<UploadedFile>> {
    paths
        .iter()
        .map(|path| {
            let upload = UploadedFile::from_path(path)
                .map_err(|e| anyhow::anyhow!("Cannot read {}: {}", path.display(), e))?;
            Ok(match mime {
                Some(mime) => upload.with_mime_type(mime),
                None => upload,
            })
        })
        .collect()
}

/// Run files through the pipeline and store the results.
pub async fn cmd_process(
    settings: &Settings,
    paths: &[PathBuf],
    options: ProcessOptions,
) -> anyhow::Result<()> {
    let uploads = collect_uploads(paths, options.mime.as_deref())?;
    let pipeline = build_pipeline(
        settings,
        options.extractor.as_deref(),
        options.seed,
        !options.no_pacing,
    )?;
    let records = open_records(settings)?;

    let results = if options.json {
        pipeline.process_batch(&uploads, None).await
    } else {
        println!(
            "{} Processing {} file(s) with the {} extractor",
            style("→").cyan(),
            uploads.len(),
            pipeline.extractor_name()
        );
        run_with_progress(&pipeline, &uploads).await
    };

    let outcomes = match options.client.as_deref() {
        Some(email) => {
            let portal = ClientPortal::new(email, pipeline.clone(), records.clone());
            let mut outcomes = Vec::with_capacity(results.len());
            for doc in &results {
                outcomes.push(portal.file_processed(doc).await?);
            }
            Some(outcomes)
        }
        None => {
            records.append_session_documents(&results).await?;
            None
        }
    };

    let routed = match options.output.as_deref() {
        Some(dir) => route_processed(dir, &uploads, &results)
            .map_err(|e| anyhow::anyhow!("Cannot route files into {}: {}", dir.display(), e))?,
        None => Vec::new(),
    };

    if options.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    print_results(&results);

    if let Some(dir) = options.output.as_deref() {
        print_routed(dir, &routed);
    }

    if let (Some(email), Some(outcomes)) = (options.client.as_deref(), outcomes) {
        let filed = outcomes
            .iter()
            .filter(|o| matches!(o, UploadOutcome::Filed { .. }))
            .count();
        println!(
            "{} Filed {} of {} document(s) for {}",
            style("✓").green(),
            filed,
            outcomes.len(),
            email
        );
    }

    Ok(())
}

/// Process a batch while rendering progress from pipeline events.
async fn run_with_progress(
    pipeline: &Pipeline,
    uploads: &[UploadedFile],
) -> Vec<ProcessedDocument> {
    let (event_tx, mut event_rx) = mpsc::channel::<BatchEvent>(100);

    // State for progress bar
    let pb = Arc::new(tokio::sync::Mutex::new(None::<ProgressBar>));
    let pb_clone = pb.clone();

    // Spawn event handler for UI
    let event_handler = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            match event {
                BatchEvent::Started { total_files } => {
                    let progress = batch_progress_bar(total_files);
                    progress.set_message("Classifying...");
                    *pb_clone.lock().await = Some(progress);
                }
                BatchEvent::FileStarted { filename, .. } => {
                    if let Some(ref progress) = *pb_clone.lock().await {
                        progress.set_message(truncate(&filename, 40));
                    }
                }
                BatchEvent::FileCompleted { document, .. } => {
                    if let Some(ref progress) = *pb_clone.lock().await {
                        progress.println(format!(
                            "{} {} → {}",
                            style("✓").green(),
                            document.filename,
                            document.display_name()
                        ));
                        progress.inc(1);
                    }
                }
                BatchEvent::FileFailed {
                    filename, error, ..
                } => {
                    if let Some(ref progress) = *pb_clone.lock().await {
                        progress.println(format!(
                            "{} {}: {}",
                            style("✗").red(),
                            filename,
                            error
                        ));
                        progress.inc(1);
                    }
                }
                BatchEvent::Finished { processed, failed } => {
                    if let Some(ref progress) = *pb_clone.lock().await {
                        progress.finish_and_clear();
                    }
                    *pb_clone.lock().await = None;

                    println!(
                        "{} Processing complete: {} classified, {} failed",
                        style("✓").green(),
                        processed,
                        failed
                    );
                }
            }
        }
    });

    let results = pipeline.process_batch(uploads, Some(event_tx)).await;

    // Wait for event handler to finish
    let _ = event_handler.await;

    results
}

fn print_results(results: &[ProcessedDocument]) {
    println!();
    println!(
        "{:<32} {:<8} {:<20} {}",
        style("File").bold(),
        style("Type").bold(),
        style("Status").bold(),
        style("New name").bold()
    );
    for doc in results {
        println!(
            "{:<32} {:<8} {:<20} {}",
            truncate(&doc.filename, 32),
            type_label(doc.classified_type),
            doc.status.as_str(),
            doc.new_filename.as_deref().unwrap_or("-")
        );
    }

    let stats = SessionStats::from_documents(results);
    println!();
    println!(
        "  {} total, {} RDL, {} RCS, {} need review",
        stats.total, stats.rdl, stats.rcs, stats.review
    );
}

fn print_routed(output_dir: &Path, routed: &[RoutedFile]) {
    println!();
    for file in routed {
        let shown = file
            .destination
            .strip_prefix(output_dir)
            .unwrap_or(&file.destination);
        println!("  {} {}", style("→").cyan(), shown.display());
    }
    println!(
        "{} Copied {} file(s) into {}",
        style("✓").green(),
        routed.len(),
        output_dir.display()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_uploads_applies_mime_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.bin");
        std::fs::write(&path, b"hello").unwrap();

        let uploads = collect_uploads(&[path], Some("application/pdf")).unwrap();
        assert_eq!(uploads.len(), 1);
        assert!(uploads[0].is_pdf());
        assert_eq!(uploads[0].size, 5);
    }

    #[test]
    fn test_collect_uploads_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = collect_uploads(&[dir.path().join("nope.pdf")], None).unwrap_err();
        assert!(err.to_string().contains("nope.pdf"));
    }

    #[tokio::test]
    async fn test_process_routes_into_output_dir() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let data = tempfile::tempdir().unwrap();

        let letter = input.path().join("rating_letter.pdf");
        let locked = input.path().join("protected_rdl.pdf");
        std::fs::write(&letter, b"letter").unwrap();
        std::fs::write(&locked, b"locked").unwrap();

        let settings = Settings {
            data_dir: data.path().to_path_buf(),
            ..Settings::default()
        };
        let options = ProcessOptions {
            client: None,
            mime: Some("application/pdf".to_string()),
            extractor: Some("synthetic".to_string()),
            seed: Some(3),
            no_pacing: true,
            json: true,
            output: Some(output.path().to_path_buf()),
        };
        cmd_process(&settings, &[letter.clone(), locked], options)
            .await
            .unwrap();

        let processed = output.path().join("processed");
        let rdl: Vec<_> = std::fs::read_dir(processed.join("RDL"))
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(rdl.len(), 1);
        assert_eq!(std::fs::read(&rdl[0]).unwrap(), b"letter");
        assert!(processed
            .join("REVIEW_NEEDED")
            .join("PASSWORD_PROTECTED_protected_rdl.pdf")
            .exists());
        assert!(letter.exists());
    }
}
