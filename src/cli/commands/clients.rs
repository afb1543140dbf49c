//! Client account and notification commands.

use console::style;

use super::helpers::{build_pipeline, open_dashboard, open_records};
use crate::config::Settings;
use crate::models::NotificationKind;
use crate::services::ClientPortal;

/// List client accounts with their document counts.
pub async fn cmd_clients_list(settings: &Settings) -> anyhow::Result<()> {
    let dashboard = open_dashboard(settings)?;
    let clients = dashboard.clients().await?;

    if clients.is_empty() {
        println!("No clients registered");
        return Ok(());
    }

    println!(
        "{:<4} {:<24} {:<32} {:<10} {}",
        style("ID").bold(),
        style("Name").bold(),
        style("Email").bold(),
        style("Documents").bold(),
        style("Last activity").bold()
    );
    for client in &clients {
        println!(
            "{:<4} {:<24} {:<32} {:<10} {}",
            client.id, client.name, client.email, client.documents, client.last_activity
        );
    }

    Ok(())
}

/// Register a client account.
pub async fn cmd_clients_add(settings: &Settings, email: &str, name: &str) -> anyhow::Result<()> {
    if !email.contains('@') {
        anyhow::bail!("Invalid email address: {}", email);
    }

    let dashboard = open_dashboard(settings)?;
    dashboard.register_client(email, name).await?;

    println!(
        "{} Registered client {} <{}>",
        style("✓").green(),
        name,
        email
    );
    Ok(())
}

/// Show a client's notifications, newest first.
pub async fn cmd_notifications(
    settings: &Settings,
    email: &str,
    mark_read: bool,
) -> anyhow::Result<()> {
    let records = open_records(settings)?;
    let pipeline = build_pipeline(settings, None, None, false)?;
    let portal = ClientPortal::new(email, pipeline, records);

    let notifications = portal.notifications().await?;
    if notifications.is_empty() {
        println!("No notifications for {}", email);
        return Ok(());
    }

    for notification in &notifications {
        let marker = match notification.kind {
            NotificationKind::Success => style("✓").green(),
            NotificationKind::Warning => style("!").yellow(),
            NotificationKind::Error => style("✗").red(),
        };
        let title = if notification.read {
            style(notification.title.as_str()).dim()
        } else {
            style(notification.title.as_str()).bold()
        };
        println!(
            "{} {} {}",
            marker,
            title,
            style(notification.timestamp.format("%Y-%m-%d %H:%M")).dim()
        );
        println!("    {}", notification.message);
    }

    if mark_read {
        let changed = portal.mark_notifications_read().await?;
        println!();
        println!(
            "{} Marked {} notification(s) read",
            style("✓").green(),
            changed
        );
    }

    Ok(())
}
