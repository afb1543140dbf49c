//! Document listing commands.

use console::style;

use super::helpers::{build_pipeline, open_dashboard, open_records, status_label, type_label};
use crate::config::Settings;
use crate::pipeline::{filter_documents, Folder, SessionStats};
use crate::services::ClientPortal;
use crate::utils::truncate;

fn parse_folder(folder: &str) -> anyhow::Result<Folder> {
    Folder::from_str(folder).ok_or_else(|| {
        anyhow::anyhow!("Unknown folder '{}' (expected all, rdl, rcs or review)", folder)
    })
}

/// List documents processed without a client account.
pub async fn cmd_session_documents(settings: &Settings, folder: &str) -> anyhow::Result<()> {
    let folder = parse_folder(folder)?;
    let records = open_records(settings)?;
    let docs = records.session_documents().await?;
    let stats = SessionStats::from_documents(&docs);

    println!(
        "{} Session: {} total, {} RDL, {} RCS, {} review",
        style("→").cyan(),
        stats.total,
        stats.rdl,
        stats.rcs,
        stats.review
    );

    let shown = filter_documents(&docs, folder);
    if shown.is_empty() {
        println!("  No documents in folder '{}'", folder.as_str());
        return Ok(());
    }

    println!();
    println!(
        "{:<32} {:<8} {:<24} {:<10} {}",
        style("Original").bold(),
        style("Type").bold(),
        style("Client").bold(),
        style("Size").bold(),
        style("New name").bold()
    );
    for doc in shown {
        println!(
            "{:<32} {:<8} {:<24} {:<10} {}",
            truncate(&doc.filename, 32),
            type_label(doc.classified_type),
            truncate(doc.client_name.as_deref().unwrap_or("-"), 24),
            doc.display_size(),
            doc.new_filename.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}

/// List one client's portal documents.
pub async fn cmd_portal_documents(
    settings: &Settings,
    email: &str,
    folder: &str,
) -> anyhow::Result<()> {
    let folder = parse_folder(folder)?;
    let records = open_records(settings)?;
    let pipeline = build_pipeline(settings, None, None, false)?;
    let portal = ClientPortal::new(email, pipeline, records);

    let stats = portal.stats().await?;
    println!(
        "{} {}: {} total, {} completed, {} review, {} processing",
        style("→").cyan(),
        email,
        stats.total,
        stats.completed,
        stats.review,
        stats.processing
    );

    let docs = portal.documents().await?;
    let shown: Vec<_> = docs
        .iter()
        .filter(|doc| folder.contains_portal(doc))
        .collect();

    if shown.is_empty() {
        println!("  No documents in folder '{}'", folder.as_str());
        return Ok(());
    }

    println!();
    for doc in shown {
        println!(
            "  {} {} ({})",
            status_label(doc.status),
            doc.processed_name.as_deref().unwrap_or(&doc.filename),
            doc.display_size()
        );
        println!(
            "    {} {} · {}",
            style(&doc.id).dim(),
            doc.upload_time.format("%Y-%m-%d %H:%M"),
            doc.details
        );
    }

    Ok(())
}

/// List documents across every client (admin view).
pub async fn cmd_client_documents(settings: &Settings, folder: &str) -> anyhow::Result<()> {
    let folder = parse_folder(folder)?;
    let dashboard = open_dashboard(settings)?;
    let docs = dashboard.filter_documents(folder).await?;

    if docs.is_empty() {
        println!("No client documents in folder '{}'", folder.as_str());
        return Ok(());
    }

    println!(
        "{:<24} {:<14} {:<32} {}",
        style("Client").bold(),
        style("Status").bold(),
        style("Document").bold(),
        style("ID").bold()
    );
    for entry in &docs {
        let doc = &entry.document;
        println!(
            "{:<24} {:<14} {:<32} {}",
            truncate(&entry.owner_name, 24),
            status_label(doc.status),
            truncate(doc.processed_name.as_deref().unwrap_or(&doc.filename), 32),
            style(&doc.id).dim()
        );
    }
    println!();
    println!("  {} document(s)", docs.len());

    Ok(())
}

/// Forget all anonymous session documents.
pub async fn cmd_clear(settings: &Settings) -> anyhow::Result<()> {
    let records = open_records(settings)?;
    let count = records.session_documents().await?.len();
    records.clear_session_documents().await?;

    println!(
        "{} Cleared {} session document(s)",
        style("✓").green(),
        count
    );
    Ok(())
}
