//! Integrity checking for content-addressed file stores
//!
//! Every file below a root is expected to be named after the lowercase hex
//! SHA-256 of its contents. Folders are validated with a fixed pool of worker
//! threads and summarised in a [`Report`](crate::core::report::Report) per root.

pub mod core;
pub mod logging;
pub mod reporting;
pub mod scanner;

pub use crate::core::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::core::digest::{compute_file_hash, is_valid_digest, verify};
    pub use crate::core::engine::{process_all, process_folder, Options, DEFAULT_WORKERS};
    pub use crate::core::error::Error;
    pub use crate::core::report::{CorruptedFile, ErroredFile, FileOutcome, Report};
    pub use crate::reporting::report_writer::{write_json, write_report, write_table};
    pub use crate::scanner::exclusion::{ExclusionFilter, TemplateSet};
}
