//! User directory entries and derived client summaries.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Client,
    Admin,
}

/// A registered user, keyed by email in the user directory.
///
/// Credentials are not modelled; login lives outside this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub name: String,
    pub role: UserRole,
}

impl UserRecord {
    pub fn client(name: &str) -> Self {
        Self {
            name: name.to_string(),
            role: UserRole::Client,
        }
    }
}

/// Users that exist on every installation.
pub fn default_users() -> Vec<(String, UserRecord)> {
    vec![
        ("client@demo.com".to_string(), UserRecord::client("Demo Client")),
        ("john@client.com".to_string(), UserRecord::client("John Smith")),
    ]
}

/// Account status of a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientStatus {
    Active,
}

/// A client row in the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSummary {
    /// 1-based position in the client listing.
    pub id: usize,
    pub name: String,
    pub email: String,
    pub status: ClientStatus,
    /// Number of documents the client has uploaded.
    pub documents: usize,
    pub last_activity: NaiveDate,
}

/// Record of an email sent from the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailActivity {
    pub timestamp: DateTime<Utc>,
    pub recipient: String,
    pub subject: String,
    pub sender: String,
}
