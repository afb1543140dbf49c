//! docsorter - document intake, classification and review queue.
//!
//! Uploaded files are run through text extraction, keyword classification
//! and client-name extraction, renamed to `<CLIENT>_<TYPE>.pdf`, and filed
//! into client portals where an admin can review what needs attention.

pub mod classify;
pub mod cli;
pub mod config;
pub mod email;
pub mod extract;
pub mod models;
pub mod pipeline;
pub mod server;
pub mod services;
pub mod storage;
pub mod utils;
