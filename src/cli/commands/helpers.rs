//! Shared helper functions for CLI commands.

use std::time::Duration;

use console::{style, StyledObject};
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::Settings;
use crate::email::EmailClient;
use crate::extract::{build_extractor, ExtractorKind};
use crate::models::{DocumentType, PortalStatus};
use crate::pipeline::Pipeline;
use crate::services::AdminDashboard;
use crate::storage::{open_store, Records};

/// Open the configured store, creating the data directory if needed.
pub fn open_records(settings: &Settings) -> anyhow::Result<Records> {
    settings.ensure_directories()?;
    let store = open_store(settings.store, &settings.data_dir)?;
    Ok(Records::new(store))
}

/// Build the admin dashboard over the configured store and email service.
pub fn open_dashboard(settings: &Settings) -> anyhow::Result<AdminDashboard> {
    dashboard_over(settings, open_records(settings)?)
}

/// Build the admin dashboard over already opened records.
pub fn dashboard_over(settings: &Settings, records: Records) -> anyhow::Result<AdminDashboard> {
    let email = EmailClient::new(&settings.email_endpoint)?;
    Ok(AdminDashboard::new(records, email, &settings.admin_email))
}

/// Build a pipeline, letting command-line flags override settings.
pub fn build_pipeline(
    settings: &Settings,
    extractor: Option<&str>,
    seed: Option<u64>,
    paced: bool,
) -> anyhow::Result<Pipeline> {
    let kind = match extractor {
        Some(name) => ExtractorKind::from_str(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown extractor: {}", name))?,
        None => settings.extractor,
    };
    let pacing = if paced {
        Duration::from_millis(settings.pacing_ms)
    } else {
        Duration::ZERO
    };

    let extractor = build_extractor(kind, seed.or(settings.seed), &settings.ocr_language);
    Ok(Pipeline::new(extractor).with_pacing(pacing))
}

/// Progress bar used for batch processing.
pub fn batch_progress_bar(total: usize) -> ProgressBar {
    let progress = ProgressBar::new(total as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}")
            .unwrap()
            .progress_chars("█▓░"),
    );
    progress
}

/// Coloured label for a document category.
pub fn type_label(doc_type: DocumentType) -> StyledObject<&'static str> {
    match doc_type {
        DocumentType::Rdl => style(doc_type.as_str()).green(),
        DocumentType::Rcs => style(doc_type.as_str()).cyan(),
        DocumentType::Review => style(doc_type.as_str()).yellow(),
        DocumentType::Error => style(doc_type.as_str()).red(),
    }
}

/// Coloured label for a portal status.
pub fn status_label(status: PortalStatus) -> StyledObject<&'static str> {
    match status {
        PortalStatus::Completed => style(status.label()).green(),
        PortalStatus::Review => style(status.label()).yellow(),
        PortalStatus::Processing => style(status.label()).cyan(),
        PortalStatus::Error => style(status.label()).red(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_pipeline_rejects_unknown_extractor() {
        let settings = Settings::default();
        assert!(build_pipeline(&settings, Some("magic"), None, false).is_err());
    }

    #[test]
    fn test_build_pipeline_pacing() {
        let settings = Settings::default();
        let paced = build_pipeline(&settings, None, Some(1), true).unwrap();
        assert_eq!(paced.pacing(), Duration::from_millis(settings.pacing_ms));

        let unpaced = build_pipeline(&settings, Some("synthetic"), None, false).unwrap();
        assert!(unpaced.pacing().is_zero());
        assert_eq!(unpaced.extractor_name(), "synthetic");
    }
}
