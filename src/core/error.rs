//! Error types for folder validation

use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a validation run.
///
/// Per-file read failures are not represented here: they are contained at the
/// worker and recorded in the folder's [`Report`](crate::core::report::Report).
#[derive(Debug, Error)]
pub enum Error {
    /// The worker pool must have at least one worker.
    #[error("worker count must be at least 1")]
    InvalidWorkerCount,

    /// An exclusion fragment could not be compiled.
    #[error("invalid exclusion pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The per-folder thread pool could not be created.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// The tree walk below a root failed.
    #[error("failed to walk {}: {source}", root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// Validation was cancelled before the folder finished.
    #[error("validation of {} was interrupted", root.display())]
    Interrupted { root: PathBuf },
}

pub type Result<T> = std::result::Result<T, Error>;
