//! Staleness detection for built assets.
//!
//! Two policies on top of plain existence:
//! - mtime: assets are stale when any source file is newer than the
//!   oldest asset file
//! - hash: assets are stale when the digest of the source files differs
//!   from the digest recorded after the last successful build

use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// All regular files under `path`, sorted. A file path yields itself.
///
/// Symlinked directories are not followed.
pub fn collect_files(path: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    walk(path, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk(path: &Path, files: &mut Vec<PathBuf>) -> io::Result<()> {
    let meta = fs::symlink_metadata(path)?;
    if meta.is_dir() {
        for entry in fs::read_dir(path)? {
            walk(&entry?.path(), files)?;
        }
    } else {
        files.push(path.to_path_buf());
    }
    Ok(())
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Oldest modification time among the asset files.
///
/// An empty asset directory counts with its own mtime.
pub fn oldest_mtime(root: &Path, assets: &[String]) -> io::Result<Option<SystemTime>> {
    let mut oldest: Option<SystemTime> = None;

    for asset in assets {
        let full = root.join(asset);
        let mut files = collect_files(&full)?;
        if files.is_empty() {
            files.push(full);
        }
        for file in files {
            if let Some(mtime) = modified(&file) {
                oldest = Some(oldest.map_or(mtime, |o| o.min(mtime)));
            }
        }
    }

    Ok(oldest)
}

/// Newest source file and its modification time.
///
/// Sources that do not exist are skipped.
pub fn newest_source(
    root: &Path,
    sources: &[String],
) -> io::Result<Option<(PathBuf, SystemTime)>> {
    let mut newest: Option<(PathBuf, SystemTime)> = None;

    for source in sources {
        let full = root.join(source);
        if !full.exists() {
            tracing::debug!("Source {} does not exist, ignoring", source);
            continue;
        }
        for file in collect_files(&full)? {
            if let Some(mtime) = modified(&file) {
                if newest.as_ref().is_none_or(|(_, n)| mtime > *n) {
                    newest = Some((file, mtime));
                }
            }
        }
    }

    Ok(newest)
}

/// Hex digest over the relative path and content of every source file.
///
/// Missing sources contribute their name only, so deleting a source
/// changes the digest.
pub fn source_digest(root: &Path, sources: &[String]) -> io::Result<String> {
    let mut hasher = Sha256::new();

    for source in sources {
        let full = root.join(source);
        if !full.exists() {
            hasher.update(b"missing:");
            hasher.update(source.as_bytes());
            continue;
        }
        for file in collect_files(&full)? {
            let relative = file.strip_prefix(root).unwrap_or(&file);
            hasher.update(relative.to_string_lossy().as_bytes());
            hasher.update([0u8]);
            hasher.update(fs::read(&file)?);
            hasher.update([0u8]);
        }
    }

    Ok(hex::encode(hasher.finalize()))
}
