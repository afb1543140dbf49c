//! The per-file classification pipeline and its batch runner.
//!
//! extract -> classify -> extract client name -> rename, one file at a
//! time in input order. Results can then be routed into a sorted output
//! tree.

mod error;
mod routing;
mod runner;
mod stats;

pub use error::ClassificationFailure;
pub use routing::{route_processed, setup_directories, Destination, RoutedFile};
pub use runner::{BatchEvent, Pipeline};
pub use stats::{filter_documents, Folder, SessionStats};
