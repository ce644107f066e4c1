//! Digest verification for content-addressed files

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use super::report::FileOutcome;

/// Length of a hex-encoded SHA-256 digest.
pub const DIGEST_HEX_LEN: usize = 64;

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Check whether `name` is a lowercase hex SHA-256 digest.
pub fn is_valid_digest(name: &str) -> bool {
    name.len() == DIGEST_HEX_LEN
        && name
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// Compute the SHA-256 of a file
///
/// # Arguments
/// * `path` - Path to the file
///
/// # Returns
/// Lowercase hex-encoded digest of the full file contents
pub fn compute_file_hash(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; READ_BUFFER_SIZE];

    loop {
        let bytes_read = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Verify that a file's name is the digest of its contents
///
/// The expected digest is the base name of `path`. Names that are not a
/// well-formed digest are classified without reading the file.
///
/// # Errors
/// Returns the underlying I/O error when the file cannot be opened or read.
pub fn verify(path: &Path) -> io::Result<FileOutcome> {
    let expected = match path.file_name().and_then(|name| name.to_str()) {
        Some(name) if is_valid_digest(name) => name,
        _ => return Ok(FileOutcome::InvalidName),
    };

    let actual = compute_file_hash(path)?;
    if actual == expected {
        Ok(FileOutcome::Intact)
    } else {
        Ok(FileOutcome::Corrupted {
            expected: expected.to_owned(),
            actual,
        })
    }
}
