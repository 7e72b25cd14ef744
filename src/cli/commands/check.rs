//! Check command implementation.
//!
//! The `assetgate check` command reports the readiness of every manifest
//! without building anything.

use serde::Serialize;

use crate::assets::{AssetManifest, AssetStatus};
use crate::cli::args::CheckArgs;
use crate::config::validate;
use crate::error::{GateError, Result};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, ProjectContext};

/// Readiness of one manifest.
#[derive(Debug, Serialize)]
pub struct ManifestReport {
    pub manifest: String,
    #[serde(flatten)]
    pub status: AssetStatus,
}

/// The check command implementation.
pub struct CheckCommand {
    project: ProjectContext,
    args: CheckArgs,
}

impl CheckCommand {
    /// Create a new check command.
    pub fn new(project: ProjectContext, args: CheckArgs) -> Self {
        Self { project, args }
    }

    /// Check every configured manifest.
    pub fn reports(&self) -> Result<Vec<ManifestReport>> {
        let config = self.project.load_config()?;
        validate(&config)?;

        let mut reports = Vec::with_capacity(config.manifests.len());
        for (name, manifest) in &config.manifests {
            let status =
                AssetManifest::from_config(name, manifest).check(&self.project.project_root)?;
            reports.push(ManifestReport {
                manifest: name.clone(),
                status,
            });
        }
        Ok(reports)
    }
}

impl Command for CheckCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let reports = self.reports()?;
        let all_ready = reports.iter().all(|r| r.status.is_ready());

        if self.args.json {
            let json =
                serde_json::to_string_pretty(&reports).map_err(|e| GateError::Other(e.into()))?;
            ui.message(&json);
        } else if reports.is_empty() {
            ui.message("No asset manifests configured");
        } else {
            for report in &reports {
                let line = format!("{}: {}", report.manifest, report.status.describe());
                if report.status.is_ready() {
                    ui.success(&line);
                } else {
                    ui.warning(&line);
                }
            }
        }

        if all_ready {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(1))
        }
    }
}
