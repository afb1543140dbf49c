//! Review queue commands.

use console::style;

use super::helpers::open_dashboard;
use crate::config::Settings;
use crate::services::{Priority, QueueKind};

/// Parse a queue filter; "all" means no filter.
fn parse_filter(filter: &str) -> anyhow::Result<Option<QueueKind>> {
    if filter.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    QueueKind::from_str(&filter.to_lowercase())
        .map(Some)
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown queue filter '{}' (expected all, password, review or error)",
                filter
            )
        })
}

/// Show open queue items.
pub async fn cmd_queue(settings: &Settings, filter: &str) -> anyhow::Result<()> {
    let kind = parse_filter(filter)?;
    let dashboard = open_dashboard(settings)?;
    let queue = dashboard.filter_queue(kind).await?;

    if queue.is_empty() {
        println!("{} Nothing waiting for review", style("✓").green());
        return Ok(());
    }

    for item in &queue {
        let priority = match item.priority {
            Priority::High => style(item.priority.as_str()).red(),
            Priority::Medium => style(item.priority.as_str()).yellow(),
        };
        println!(
            "{} [{}] {} ({} <{}>)",
            style(&item.id).bold(),
            priority,
            item.filename,
            item.client_name,
            item.client_email
        );
        println!("    {}: {}", item.kind.label(), item.issue);
        println!("    {} {}", style("→").dim(), item.action);
    }
    println!();
    println!("  {} open item(s)", queue.len());

    Ok(())
}

/// Mark a queue item resolved.
pub async fn cmd_resolve(settings: &Settings, id: &str) -> anyhow::Result<()> {
    let dashboard = open_dashboard(settings)?;

    if dashboard.resolve(id).await? {
        println!("{} Resolved {}", style("✓").green(), id);
        Ok(())
    } else {
        anyhow::bail!("No open queue item with ID {}", id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter() {
        assert_eq!(parse_filter("all").unwrap(), None);
        assert_eq!(parse_filter("Password").unwrap(), Some(QueueKind::Password));
        assert!(parse_filter("urgent").is_err());
    }
}
