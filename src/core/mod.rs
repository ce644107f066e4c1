//! Digest verification and the concurrent validation engine

pub mod digest;
pub mod engine;
pub mod error;
pub mod report;

pub use engine::{process_all, process_folder, Options};
pub use error::{Error, Result};
pub use report::{CorruptedFile, ErroredFile, FileOutcome, Report};
