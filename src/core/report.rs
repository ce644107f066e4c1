//! Per-folder validation report

use serde::Serialize;
use std::io;
use std::path::PathBuf;

/// Classification of a single evaluated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// The file name equals the SHA-256 of its contents.
    Intact,
    /// The file name is a well-formed digest but the contents hash differently.
    Corrupted { expected: String, actual: String },
    /// The file name is not 64 lowercase hex characters.
    InvalidName,
}

/// A file whose contents no longer match its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorruptedFile {
    pub file_path: PathBuf,
    pub expected_hash: String,
    pub actual_hash: String,
}

/// A file that could not be opened or read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErroredFile {
    pub file_path: PathBuf,
    pub error: String,
}

/// Aggregated result of validating one folder root.
///
/// `intact_files + corrupted_files + invalid_files == total_files` always
/// holds. Unreadable files are tracked separately and are not part of
/// `total_files`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub folder_path: PathBuf,
    pub total_files: usize,
    pub intact_files: usize,
    pub corrupted_files: usize,
    pub corrupted_file_list: Vec<CorruptedFile>,
    pub invalid_files: usize,
    pub invalid_file_list: Vec<PathBuf>,
    pub errored_files: usize,
    pub errored_file_list: Vec<ErroredFile>,
}

impl Report {
    pub fn new(folder_path: impl Into<PathBuf>) -> Self {
        Self {
            folder_path: folder_path.into(),
            ..Self::default()
        }
    }

    /// Fold the verification result for `path` into the report.
    pub fn record(&mut self, path: PathBuf, result: io::Result<FileOutcome>) {
        match result {
            Ok(outcome) => self.record_outcome(path, outcome),
            Err(e) => {
                self.errored_files += 1;
                self.errored_file_list.push(ErroredFile {
                    file_path: path,
                    error: e.to_string(),
                });
            }
        }
    }

    fn record_outcome(&mut self, path: PathBuf, outcome: FileOutcome) {
        self.total_files += 1;
        match outcome {
            FileOutcome::Intact => self.intact_files += 1,
            FileOutcome::Corrupted { expected, actual } => {
                self.corrupted_files += 1;
                self.corrupted_file_list.push(CorruptedFile {
                    file_path: path,
                    expected_hash: expected,
                    actual_hash: actual,
                });
            }
            FileOutcome::InvalidName => {
                self.invalid_files += 1;
                self.invalid_file_list.push(path);
            }
        }
    }
}
