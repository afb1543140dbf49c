//! Client-facing and admin-facing views over the pipeline and store.

mod admin;
mod portal;

use thiserror::Error;

use crate::email::EmailError;
use crate::storage::StoreError;

pub use admin::{
    email_type_for, AdminDashboard, ClientDocument, DashboardStats, Priority, QueueItem, QueueKind,
};
pub use portal::{ClientPortal, PortalStats, UploadOutcome};

/// Errors from dashboard operations that reach external collaborators.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Email(#[from] EmailError),
}
