//! Data models for docsorter.

mod document;
mod notification;
mod portal;
mod upload;
mod user;

pub use document::{DocumentType, ProcessedDocument, ProcessingStatus, UNKNOWN_CLIENT};
pub use notification::{Notification, NotificationKind};
pub use portal::{PortalDocument, PortalStatus};
pub use upload::UploadedFile;
pub use user::{
    default_users, ClientStatus, ClientSummary, EmailActivity, UserRecord, UserRole,
};
