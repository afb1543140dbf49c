//! Status command.

use console::style;

use super::helpers::{dashboard_over, open_records};
use crate::config::Settings;
use crate::extract::{ExtractorKind, PopplerExtractor};

/// Show configuration and dashboard statistics.
pub async fn cmd_status(settings: &Settings) -> anyhow::Result<()> {
    println!("{}", style("Configuration").bold());
    println!("  Data dir:   {}", settings.data_dir.display());
    println!("  Store:      {}", settings.store.as_str());
    println!("  Extractor:  {}", settings.extractor.as_str());
    if settings.extractor == ExtractorKind::Poppler {
        println!("  OCR lang:   {}", settings.ocr_language);
    }
    println!("  Email:      {}", settings.email_endpoint);
    println!("  Sender:     {}", settings.admin_email);
    println!("  Pacing:     {} ms", settings.pacing_ms);
    if let Some(seed) = settings.seed {
        println!("  Seed:       {}", seed);
    }

    if settings.extractor == ExtractorKind::Poppler {
        let missing: Vec<String> = PopplerExtractor::check_tools()
            .into_iter()
            .filter(|(_, available)| !available)
            .map(|(tool, _)| tool)
            .collect();
        if !missing.is_empty() {
            println!(
                "  {} Missing tools: {}",
                style("!").yellow(),
                missing.join(", ")
            );
        }
    }

    let records = open_records(settings)?;
    let dashboard = dashboard_over(settings, records.clone())?;
    let stats = dashboard.stats().await?;

    println!();
    println!("{}", style("Dashboard").bold());
    println!("  Documents:       {}", stats.total_documents);
    println!("  Processed:       {}", stats.processed_docs);
    println!("  Needing review:  {}", stats.review_docs);
    println!("  Active clients:  {}", stats.active_clients);

    let session = records.session_documents().await?.len();
    println!("  Session docs:    {}", session);

    Ok(())
}
