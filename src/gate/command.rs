//! Packaging commands.
//!
//! Every packaging command, gated or not, implements [`PackagingCommand`].
//! Gates wrap a command and delegate to it, so a wrapped command can be
//! wrapped again or run on its own.

use std::path::{Path, PathBuf};

use crate::error::{GateError, Result};
use crate::shell::{execute, CommandOptions};
use crate::ui::UserInterface;

/// Per-invocation state handed to every command.
pub struct RunContext<'a> {
    project_root: PathBuf,
    pub ui: &'a mut dyn UserInterface,
}

impl<'a> RunContext<'a> {
    pub fn new(project_root: &Path, ui: &'a mut dyn UserInterface) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            ui,
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }
}

/// A packaging action.
pub trait PackagingCommand {
    /// Command name as typed on the command line.
    fn name(&self) -> &str;

    /// Perform the action.
    fn run(&self, ctx: &mut RunContext<'_>) -> Result<()>;
}

impl<T: PackagingCommand + ?Sized> PackagingCommand for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn run(&self, ctx: &mut RunContext<'_>) -> Result<()> {
        (**self).run(ctx)
    }
}

/// Lines of captured output shown when a command fails.
const FAILURE_TAIL_LINES: usize = 20;

/// A packaging command backed by a shell line.
///
/// A command without a shell line does nothing on its own; it exists to
/// hang a gate or dependencies on.
#[derive(Debug, Clone)]
pub struct ShellCommand {
    name: String,
    run: Option<String>,
}

impl ShellCommand {
    pub fn new(name: &str, run: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            run,
        }
    }
}

impl PackagingCommand for ShellCommand {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, ctx: &mut RunContext<'_>) -> Result<()> {
        let Some(line) = &self.run else {
            tracing::debug!("{} has no shell line", self.name);
            return Ok(());
        };

        let streaming = ctx.ui.output_mode().shows_command_output();
        let options = if streaming {
            CommandOptions::inherited(ctx.project_root())
        } else {
            CommandOptions::captured(ctx.project_root())
        };

        tracing::info!("Running {}: {}", self.name, line);
        let mut spinner = ctx.ui.start_spinner(&format!("{}: {}", self.name, line));
        let result = execute(line, &options)?;

        if result.success {
            spinner.finish_success(&format!(
                "{} ({:.1}s)",
                self.name,
                result.duration.as_secs_f64()
            ));
            return Ok(());
        }

        spinner.finish_error(&format!("{} failed", self.name));
        let output = format!("{}{}", result.stdout, result.stderr);
        let lines: Vec<&str> = output.lines().collect();
        for out in &lines[lines.len().saturating_sub(FAILURE_TAIL_LINES)..] {
            ctx.ui.message(out);
        }

        Err(GateError::CommandFailed {
            command: line.clone(),
            code: result.exit_code,
        })
    }
}
