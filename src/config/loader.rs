//! Configuration file discovery and loading.
//!
//! Configuration lives in `.assetgate/config.yml` with an optional,
//! uncommitted `.assetgate/config.local.yml` layered on top.

use crate::config::merger::merge_configs;
use crate::config::schema::GateConfig;
use crate::error::{GateError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding configuration and build stamps.
pub const CONFIG_DIR: &str = ".assetgate";

/// Paths to configuration files in merge order.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// Project config: .assetgate/config.yml
    pub project: Option<PathBuf>,

    /// Local overrides: .assetgate/config.local.yml
    pub project_local: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover config files for the given project root.
    pub fn discover(project_root: &Path) -> Self {
        let existing = |name: &str| {
            let path = project_root.join(CONFIG_DIR).join(name);
            path.exists().then_some(path)
        };

        Self {
            project: existing("config.yml"),
            project_local: existing("config.local.yml"),
        }
    }

    /// Returns all existing config paths in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        self.project.iter().chain(self.project_local.iter()).collect()
    }

    /// Check if the project config exists.
    pub fn has_project_config(&self) -> bool {
        self.project.is_some()
    }
}

/// Find the project root by walking up from `start`.
///
/// Looks for a `.assetgate` directory first, then falls back to `.git`.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        if current.join(CONFIG_DIR).is_dir() {
            return Some(current);
        }

        if current.join(".git").exists() {
            return Some(current);
        }

        if !current.pop() {
            return None;
        }
    }
}

fn read_config(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            GateError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            GateError::Io(e)
        }
    })
}

/// Load a single config file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<GateConfig> {
    let content = read_config(path)?;
    parse_config(&content, path)
}

/// Parse YAML content into a [`GateConfig`].
pub fn parse_config(content: &str, source_path: &Path) -> Result<GateConfig> {
    if content.trim().is_empty() {
        return Ok(GateConfig::default());
    }

    serde_yaml::from_str(content).map_err(|e| GateError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load a config file as a raw YAML value, for merging.
pub fn load_config_value(path: &Path) -> Result<serde_yaml::Value> {
    let content = read_config(path)?;

    serde_yaml::from_str(&content).map_err(|e| GateError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load and merge the project config and its local override.
///
/// # Errors
///
/// Returns `ConfigNotFound` if no project config exists.
/// Returns `ConfigParseError` if any file is invalid.
pub fn load_merged_config(project_root: &Path) -> Result<GateConfig> {
    let paths = ConfigPaths::discover(project_root);
    let project_path = project_root.join(CONFIG_DIR).join("config.yml");

    if !paths.has_project_config() {
        return Err(GateError::ConfigNotFound { path: project_path });
    }

    let layers = paths
        .all_existing()
        .into_iter()
        .map(|p| load_config_value(p))
        .collect::<Result<Vec<_>>>()?;

    let merged = merge_configs(&layers);
    tracing::debug!("Merged {} config layer(s)", layers.len());

    serde_yaml::from_value(merged).map_err(|e| GateError::ConfigParseError {
        path: project_path,
        message: format!("Failed to parse merged config: {}", e),
    })
}

/// Load config with optional path override.
///
/// If `config_override` is provided, loads only that file without merging.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<GateConfig> {
    match config_override {
        Some(path) => load_config_file(path),
        None => load_merged_config(project_root),
    }
}
