//! Client emails: templates and the outbound endpoint client.

mod client;
mod templates;

pub use client::{EmailClient, EmailError, DEFAULT_EMAIL_ENDPOINT};
pub use templates::{EmailTemplate, RenderedEmail, TemplateContext};
