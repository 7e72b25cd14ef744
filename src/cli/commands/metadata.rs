//! Metadata command implementation.
//!
//! The `assetgate metadata` command prints the package metadata section.

use crate::cli::args::MetadataArgs;
use crate::config::validate;
use crate::error::{GateError, Result};
use crate::ui::theme::GateTheme;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, ProjectContext};

/// The metadata command implementation.
pub struct MetadataCommand {
    project: ProjectContext,
    args: MetadataArgs,
}

impl MetadataCommand {
    /// Create a new metadata command.
    pub fn new(project: ProjectContext, args: MetadataArgs) -> Self {
        Self { project, args }
    }
}

impl Command for MetadataCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = self.project.load_config()?;
        validate(&config)?;
        let package = &config.package;

        if self.args.json {
            let json =
                serde_json::to_string_pretty(package).map_err(|e| GateError::Other(e.into()))?;
            ui.message(&json);
            return Ok(CommandResult::success());
        }
        if self.args.yaml {
            let yaml = serde_yaml::to_string(package).map_err(|e| GateError::Other(e.into()))?;
            ui.message(&yaml);
            return Ok(CommandResult::success());
        }

        let theme = GateTheme::new();
        let field = |key: &str, value: &str| {
            format!("  {} {}", theme.dim.apply_to(format!("{}:", key)), value)
        };

        ui.message(&format!(
            "{} {}",
            theme.highlight.apply_to(&package.name),
            package.version.as_deref().unwrap_or("")
        ));
        for (key, value) in [
            ("description", &package.description),
            ("license", &package.license),
            ("url", &package.url),
        ] {
            if let Some(value) = value {
                ui.message(&field(key, value));
            }
        }
        if !package.keywords.is_empty() {
            ui.message(&field("keywords", &package.keywords.join(", ")));
        }
        for (script, target) in &package.entry_points {
            ui.message(&field("entry point", &format!("{} = {}", script, target)));
        }
        for requirement in &package.install_requires {
            ui.message(&field("requires", requirement));
        }
        for (extra, requirements) in &package.extras_require {
            ui.message(&field(
                &format!("extra [{}]", extra),
                &requirements.join(", "),
            ));
        }

        Ok(CommandResult::success())
    }
}
