//! Initialize command.

use console::style;

use super::helpers::open_records;
use crate::config::{Config, Settings, CONFIG_NAME};
use crate::extract::{ExtractorKind, PopplerExtractor};

/// Initialize the data directory and store.
pub async fn cmd_init(settings: &Settings, config: &Config) -> anyhow::Result<()> {
    let records = open_records(settings)?;
    let keys = records.store().keys().await?;

    println!(
        "  {} {} store ready ({} keys)",
        style("✓").green(),
        records.store().name(),
        keys.len()
    );

    if settings.extractor == ExtractorKind::Poppler {
        for (tool, available) in PopplerExtractor::check_tools() {
            if available {
                println!("  {} {} found", style("✓").green(), tool);
            } else {
                println!("  {} {} not found in PATH", style("!").yellow(), tool);
            }
        }
    }

    match config.source_path {
        Some(ref path) => println!("  {} Config: {}", style("✓").green(), path.display()),
        None => println!(
            "{} No {}.toml found, using defaults",
            style("!").yellow(),
            CONFIG_NAME
        ),
    }

    println!(
        "{} Initialized docsorter in {}",
        style("✓").green(),
        settings.data_dir.display()
    );

    Ok(())
}
