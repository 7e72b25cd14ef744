//! Clean command implementation.
//!
//! The `assetgate clean` command prunes dependency directories and runs the
//! configured clean command.

use crate::cli::args::CleanArgs;
use crate::error::Result;
use crate::ui::UserInterface;
use crate::workspace::clean;

use super::dispatcher::{Command, CommandResult, ProjectContext};

/// The clean command implementation.
pub struct CleanCommand {
    project: ProjectContext,
    args: CleanArgs,
}

impl CleanCommand {
    /// Create a new clean command.
    pub fn new(project: ProjectContext, args: CleanArgs) -> Self {
        Self { project, args }
    }
}

impl Command for CleanCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = self.project.load_config()?;
        let root = &self.project.project_root;
        let dry_run = self.args.dry_run;

        if dry_run {
            ui.message("Dry run: nothing will be removed");
        }

        let report = clean(root, &config.clean, dry_run)?;

        let verb = if dry_run { "Would remove" } else { "Removed" };
        for dir in &report.pruned {
            let shown = dir.strip_prefix(root).unwrap_or(dir);
            ui.message(&format!("{} {}", verb, shown.display()));
        }
        if let Some(command) = &report.command {
            let verb = if dry_run { "Would run" } else { "Ran" };
            ui.message(&format!("{} {}", verb, command));
        }

        if !dry_run {
            ui.success("Project cleaned");
        }
        Ok(CommandResult::success())
    }
}
