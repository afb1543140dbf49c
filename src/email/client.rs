//! HTTP client for the external email-sending endpoint.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Default endpoint of the email service.
pub const DEFAULT_EMAIL_ENDPOINT: &str = "http://localhost:5000";

/// Errors from the email endpoint.
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Cannot reach email service at {endpoint}: {message}")]
    Connection { endpoint: String, message: String },

    #[error("Email service rejected the request: {0}")]
    Rejected(String),

    #[error("Unexpected response from email service: {0}")]
    Parse(String),
}

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    recipient: &'a str,
    subject: &'a str,
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmailResponse {
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Client for the `/api/send-email` and `/api/test-email` endpoints.
#[derive(Clone)]
pub struct EmailClient {
    client: Client,
    endpoint: String,
}

impl EmailClient {
    pub fn new(endpoint: &str) -> Result<Self, EmailError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| EmailError::Client(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one email. No retry.
    pub async fn send(&self, recipient: &str, subject: &str, message: &str) -> Result<(), EmailError> {
        debug!("Sending email to {}: {}", recipient, subject);
        let request = SendEmailRequest {
            recipient,
            subject,
            message,
        };
        self.post("/api/send-email", Some(&request)).await
    }

    /// Ask the service to send its own test message.
    pub async fn test_connection(&self) -> Result<(), EmailError> {
        self.post::<SendEmailRequest<'_>>("/api/test-email", None).await
    }

    async fn post<T: Serialize>(&self, path: &str, body: Option<&T>) -> Result<(), EmailError> {
        let url = format!("{}{}", self.endpoint, path);
        let mut request = self.client.post(&url);
        request = match body {
            Some(body) => request.json(body),
            None => request.header(reqwest::header::CONTENT_TYPE, "application/json"),
        };

        let resp = request.send().await.map_err(|e| EmailError::Connection {
            endpoint: self.endpoint.clone(),
            message: e.to_string(),
        })?;

        let status = resp.status();
        let parsed: EmailResponse = match resp.json().await {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(EmailError::Rejected(format!("HTTP {}", status)))
            }
            Err(e) => return Err(EmailError::Parse(e.to_string())),
        };

        if parsed.success {
            Ok(())
        } else {
            Err(EmailError::Rejected(
                parsed.error.unwrap_or_else(|| "Unknown error".to_string()),
            ))
        }
    }
}
