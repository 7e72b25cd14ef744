//! Removal of stale packaging files.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::Result;

/// Remove each of `files` from the project root.
///
/// Files that do not exist are skipped. Returns the names actually removed.
pub fn remove_stale_files(root: &Path, files: &[String]) -> Result<Vec<String>> {
    let mut removed = Vec::new();

    for name in files {
        let path = root.join(name);
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!("Removed stale {}", path.display());
                removed.push(name.clone());
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }

    Ok(removed)
}
