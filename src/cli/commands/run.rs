//! Run command implementation.
//!
//! The `assetgate run` command runs packaging commands through their gates.

use crate::cli::args::RunArgs;
use crate::error::Result;
use crate::gate::{PackagingSession, RunOptions};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, ProjectContext};

/// The run command implementation.
pub struct RunCommand {
    project: ProjectContext,
    args: RunArgs,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(project: ProjectContext, args: RunArgs) -> Self {
        Self { project, args }
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = self.project.load_config()?;
        let session = PackagingSession::new(config, &self.project.project_root)?;

        ui.show_header(&format!("Packaging {}", session.config().package.name));
        if self.args.strict {
            ui.message("Strict mode: assets will not be built on demand");
        }

        let options = RunOptions {
            commands: self.args.commands.clone(),
            force_strict: self.args.strict,
        };
        let completed = session.run(&options, ui)?;

        ui.success(&format!("Finished {}", completed.join(", ")));
        Ok(CommandResult::success())
    }
}
