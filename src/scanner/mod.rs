//! File discovery and exclusion

pub mod exclusion;
pub mod file_scanner;

pub use exclusion::{ExclusionFilter, TemplateSet};
pub use file_scanner::regular_files;
