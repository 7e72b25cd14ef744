//! Asset manifests and readiness checks.

use std::path::Path;

use serde::Serialize;

use super::freshness::{newest_source, oldest_mtime, source_digest};
use super::stamp::BuildStamp;
use crate::config::{Freshness, ManifestConfig};
use crate::error::Result;

/// Outcome of checking a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AssetStatus {
    /// Every path exists and is current.
    Ready,

    /// Some expected paths do not exist.
    Missing { paths: Vec<String> },

    /// Everything exists but the freshness policy says it is out of date.
    Stale { reason: String },
}

impl AssetStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, AssetStatus::Ready)
    }

    /// One-line description for status output.
    pub fn describe(&self) -> String {
        match self {
            AssetStatus::Ready => "ready".to_string(),
            AssetStatus::Missing { paths } => format!("missing: {}", paths.join(", ")),
            AssetStatus::Stale { reason } => format!("stale: {}", reason),
        }
    }
}

/// A named set of expected build outputs.
#[derive(Debug, Clone)]
pub struct AssetManifest {
    pub name: String,
    pub paths: Vec<String>,
    pub sources: Vec<String>,
    pub freshness: Freshness,
    pub build: Option<String>,
}

impl AssetManifest {
    pub fn from_config(name: &str, config: &ManifestConfig) -> Self {
        Self {
            name: name.to_string(),
            paths: config.paths.clone(),
            sources: config.sources.clone(),
            freshness: config.freshness,
            build: config.build.clone(),
        }
    }

    /// Check the manifest against the project tree.
    ///
    /// Existence is always checked first; the freshness policy only runs
    /// once every path is present.
    pub fn check(&self, root: &Path) -> Result<AssetStatus> {
        let missing = self.missing(root);
        if !missing.is_empty() {
            return Ok(AssetStatus::Missing { paths: missing });
        }

        match self.freshness {
            Freshness::Exists => Ok(AssetStatus::Ready),
            Freshness::Mtime => self.check_mtime(root),
            Freshness::Hash => self.check_hash(root),
        }
    }

    /// Expected paths that do not exist, in manifest order.
    pub fn missing(&self, root: &Path) -> Vec<String> {
        self.paths
            .iter()
            .filter(|p| !root.join(p).exists())
            .cloned()
            .collect()
    }

    fn check_mtime(&self, root: &Path) -> Result<AssetStatus> {
        let Some(oldest) = oldest_mtime(root, &self.paths)? else {
            return Ok(AssetStatus::Ready);
        };
        let Some((source, newest)) = newest_source(root, &self.sources)? else {
            return Ok(AssetStatus::Ready);
        };

        if newest > oldest {
            let relative = source.strip_prefix(root).unwrap_or(&source);
            Ok(AssetStatus::Stale {
                reason: format!("{} is newer than the built assets", relative.display()),
            })
        } else {
            Ok(AssetStatus::Ready)
        }
    }

    fn check_hash(&self, root: &Path) -> Result<AssetStatus> {
        let Some(stamp) = BuildStamp::load(root, &self.name) else {
            return Ok(AssetStatus::Stale {
                reason: "no record of a previous build".to_string(),
            });
        };

        let digest = source_digest(root, &self.sources)?;
        if digest == stamp.digest {
            Ok(AssetStatus::Ready)
        } else {
            Ok(AssetStatus::Stale {
                reason: format!(
                    "sources changed since the build at {}",
                    stamp.built_at.format("%Y-%m-%d %H:%M:%S UTC")
                ),
            })
        }
    }

    /// Record a successful build so hash freshness has a reference point.
    pub fn record_build(&self, root: &Path) -> Result<()> {
        let digest = source_digest(root, &self.sources)?;
        BuildStamp::new(digest).save(root, &self.name)?;
        tracing::debug!("Recorded build stamp for {}", self.name);
        Ok(())
    }
}
