//! Build stamps.
//!
//! After a successful asset build the source digest is written to
//! `.assetgate/stamps/<manifest>.json`. Hash freshness compares against it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::CONFIG_DIR;
use crate::error::Result;

/// Record of the last successful build of a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStamp {
    /// Source digest at build time.
    pub digest: String,

    /// When the build finished.
    pub built_at: DateTime<Utc>,
}

impl BuildStamp {
    pub fn new(digest: String) -> Self {
        Self {
            digest,
            built_at: Utc::now(),
        }
    }

    /// Location of the stamp for `manifest`.
    pub fn path(root: &Path, manifest: &str) -> PathBuf {
        root.join(CONFIG_DIR)
            .join("stamps")
            .join(format!("{}.json", manifest))
    }

    /// Load the stamp, treating a missing or unreadable file as absent.
    pub fn load(root: &Path, manifest: &str) -> Option<Self> {
        let content = fs::read_to_string(Self::path(root, manifest)).ok()?;
        match serde_json::from_str(&content) {
            Ok(stamp) => Some(stamp),
            Err(e) => {
                tracing::warn!("Ignoring unreadable build stamp for {}: {}", manifest, e);
                None
            }
        }
    }

    pub fn save(&self, root: &Path, manifest: &str) -> Result<()> {
        let path = Self::path(root, manifest);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(anyhow::Error::from)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn save_then_load() {
        let temp = TempDir::new().unwrap();
        let stamp = BuildStamp::new("abc123".to_string());

        stamp.save(temp.path(), "assets").unwrap();

        assert!(temp
            .path()
            .join(".assetgate/stamps/assets.json")
            .exists());
        assert_eq!(BuildStamp::load(temp.path(), "assets"), Some(stamp));
    }

    #[test]
    fn load_missing_is_none() {
        let temp = TempDir::new().unwrap();
        assert!(BuildStamp::load(temp.path(), "assets").is_none());
    }

    #[test]
    fn load_corrupt_is_none() {
        let temp = TempDir::new().unwrap();
        let path = BuildStamp::path(temp.path(), "core");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();

        assert!(BuildStamp::load(temp.path(), "core").is_none());
    }
}
