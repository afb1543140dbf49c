//! Command-line interface for `docsort`.

mod commands;

pub use commands::{is_verbose, run};
