//! Recursive discovery of regular files below a root

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::core::error::{Error, Result};

/// Iterate every regular file below `root`
///
/// Directories are traversed but never yielded. Symbolic links are not
/// followed and are not yielded. The first walk error is yielded as
/// [`Error::Walk`]; callers are expected to stop there.
pub fn regular_files(root: &Path) -> impl Iterator<Item = Result<PathBuf>> {
    let root_buf = root.to_path_buf();
    WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(move |entry| match entry {
            Ok(entry) if entry.file_type().is_file() => Some(Ok(entry.into_path())),
            Ok(_) => None,
            Err(source) => Some(Err(Error::Walk {
                root: root_buf.clone(),
                source,
            })),
        })
}
