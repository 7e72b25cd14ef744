//! Project cleanup.
//!
//! Prunes dependency directories such as `node_modules` anywhere in the
//! tree, then runs the configured clean command in the project root.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::CleanConfig;
use crate::error::{GateError, Result};
use crate::shell::{execute, CommandOptions};

/// What a clean removed, or would remove on a dry run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub pruned: Vec<PathBuf>,
    pub command: Option<String>,
}

/// Find every directory named in `names` below `root`.
///
/// Matches are not descended into, and symlinked directories are never
/// followed.
pub fn find_prunable(root: &Path, names: &[String]) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }

            let path = entry.path();
            if names.iter().any(|n| entry.file_name() == n.as_str()) {
                found.push(path);
            } else if entry.file_name() != ".git" {
                pending.push(path);
            }
        }
    }

    found.sort();
    Ok(found)
}

/// Clean the project. With `dry_run` nothing is touched.
pub fn clean(root: &Path, config: &CleanConfig, dry_run: bool) -> Result<CleanReport> {
    let pruned = find_prunable(root, &config.prune_dirs)?;

    if !dry_run {
        for dir in &pruned {
            tracing::info!("Removing {}", dir.display());
            fs::remove_dir_all(dir)?;
        }

        if let Some(line) = &config.command {
            tracing::info!("Running clean command: {}", line);
            let result = execute(line, &CommandOptions::captured(root))?;
            if !result.success {
                return Err(GateError::CommandFailed {
                    command: line.clone(),
                    code: result.exit_code,
                });
            }
        }
    }

    Ok(CleanReport {
        pruned,
        command: config.command.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        for dir in [
            "node_modules/react/node_modules",
            "packages/app/node_modules/left-pad",
            "packages/app/src",
        ] {
            fs::create_dir_all(temp.path().join(dir)).unwrap();
        }
        temp
    }

    fn config(command: Option<&str>) -> CleanConfig {
        CleanConfig {
            prune_dirs: vec!["node_modules".to_string()],
            command: command.map(String::from),
        }
    }

    #[test]
    fn finds_top_level_matches_only() {
        let temp = tree();
        let found = find_prunable(temp.path(), &["node_modules".to_string()]).unwrap();

        assert_eq!(
            found,
            vec![
                temp.path().join("node_modules"),
                temp.path().join("packages/app/node_modules"),
            ]
        );
    }

    #[test]
    fn dry_run_touches_nothing() {
        let temp = tree();
        let report = clean(temp.path(), &config(Some("touch ran")), true).unwrap();

        assert_eq!(report.pruned.len(), 2);
        assert!(temp.path().join("node_modules").exists());
        assert!(!temp.path().join("ran").exists());
    }

    #[test]
    fn clean_prunes_and_runs_command() {
        let temp = tree();
        clean(temp.path(), &config(Some("touch ran")), false).unwrap();

        assert!(!temp.path().join("node_modules").exists());
        assert!(!temp.path().join("packages/app/node_modules").exists());
        assert!(temp.path().join("packages/app/src").exists());
        assert!(temp.path().join("ran").exists());
    }

    #[test]
    fn failing_clean_command_is_an_error() {
        let temp = tree();
        let err = clean(temp.path(), &config(Some("exit 2")), false).unwrap_err();
        assert!(matches!(err, GateError::CommandFailed { code: Some(2), .. }));
    }
}
