//! Email commands.

use console::style;

use super::helpers::open_dashboard;
use crate::config::Settings;
use crate::email::{EmailTemplate, RenderedEmail};
use crate::services::AdminDashboard;

/// Resolve a template name, warning when it falls back to the general one.
fn template_named(name: &str) -> EmailTemplate {
    let template = EmailTemplate::from_name(name);
    if template.as_str() != name {
        println!(
            "{} Unknown template '{}', using '{}'",
            style("!").yellow(),
            name,
            template.as_str()
        );
    }
    template
}

/// Render the email to send, from a stored document when one is named.
async fn compose(
    dashboard: &AdminDashboard,
    template: Option<&str>,
    document_id: Option<&str>,
    filename: &str,
) -> anyhow::Result<(EmailTemplate, RenderedEmail)> {
    let Some(document_id) = document_id else {
        let template = template_named(template.unwrap_or(EmailTemplate::General.as_str()));
        return Ok((template, dashboard.compose(template, filename, None)));
    };

    let document = dashboard
        .all_documents()
        .await?
        .into_iter()
        .map(|entry| entry.document)
        .find(|doc| doc.id == document_id)
        .ok_or_else(|| anyhow::anyhow!("No document with ID {}", document_id))?;

    Ok(match template {
        Some(name) => {
            let template = template_named(name);
            let email = dashboard.compose(template, &document.filename, Some(&document));
            (template, email)
        }
        None => dashboard.compose_for_document(&document),
    })
}

/// Render a template and send it.
pub async fn cmd_email_send(
    settings: &Settings,
    recipient: &str,
    template: Option<&str>,
    document_id: Option<&str>,
    filename: &str,
    dry_run: bool,
) -> anyhow::Result<()> {
    let dashboard = open_dashboard(settings)?;
    let (template, email) = compose(&dashboard, template, document_id, filename).await?;

    if dry_run {
        println!("{} {}", style("To:").bold(), recipient);
        println!("{} {}", style("Template:").bold(), template.as_str());
        println!("{} {}", style("Subject:").bold(), email.subject);
        println!();
        println!("{}", email.message);
        return Ok(());
    }

    match dashboard
        .send_email(recipient, &email.subject, &email.message)
        .await
    {
        Ok(()) => {
            println!(
                "{} Sent '{}' to {}",
                style("✓").green(),
                template.as_str(),
                recipient
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("{} Failed to send email: {}", style("✗").red(), e);
            Err(e.into())
        }
    }
}

/// Check the email service connection.
pub async fn cmd_email_test(settings: &Settings) -> anyhow::Result<()> {
    let dashboard = open_dashboard(settings)?;
    println!(
        "{} Testing email service at {}",
        style("→").cyan(),
        settings.email_endpoint
    );

    match dashboard.test_email_connection().await {
        Ok(()) => {
            println!("  {} Email service is working", style("✓").green());
            Ok(())
        }
        Err(e) => {
            eprintln!("  {} {}", style("✗").red(), e);
            Err(e.into())
        }
    }
}

/// Show the email activity log.
pub async fn cmd_email_log(settings: &Settings) -> anyhow::Result<()> {
    let dashboard = open_dashboard(settings)?;
    let activities = dashboard.email_activities().await?;

    if activities.is_empty() {
        println!("No emails sent yet");
        return Ok(());
    }

    for activity in &activities {
        println!(
            "{} {} → {}",
            style(activity.timestamp.format("%Y-%m-%d %H:%M")).dim(),
            activity.sender,
            activity.recipient
        );
        println!("    {}", activity.subject);
    }

    Ok(())
}

/// List template names and subjects.
pub fn cmd_email_templates() -> anyhow::Result<()> {
    for template in EmailTemplate::ALL {
        println!(
            "{:<16} {}",
            style(template.as_str()).cyan(),
            template.subject()
        );
    }
    Ok(())
}
