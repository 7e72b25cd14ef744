//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands};
use crate::config::{load_config, GateConfig};
use crate::error::Result;
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// Errors are terminal; the caller reports them and picks the exit
    /// code from [`GateError::exit_code`](crate::error::GateError::exit_code).
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Where a command finds its project and configuration.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    pub project_root: PathBuf,
    pub config_override: Option<PathBuf>,
}

impl ProjectContext {
    /// Load the project configuration, honoring `--config`.
    pub fn load_config(&self) -> Result<GateConfig> {
        load_config(&self.project_root, self.config_override.as_deref())
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    project: ProjectContext,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given project root.
    pub fn new(project_root: PathBuf) -> Self {
        Self {
            project: ProjectContext {
                project_root,
                config_override: None,
            },
        }
    }

    /// Load configuration from `path` instead of the project directory.
    pub fn with_config_override(mut self, path: Option<PathBuf>) -> Self {
        self.project.config_override = path;
        self
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project.project_root
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let project = self.project.clone();
        match &cli.command {
            Commands::Run(args) => super::run::RunCommand::new(project, args.clone()).execute(ui),
            Commands::Check(args) => {
                super::check::CheckCommand::new(project, args.clone()).execute(ui)
            }
            Commands::List(args) => {
                super::list::ListCommand::new(project, args.clone()).execute(ui)
            }
            Commands::Metadata(args) => {
                super::metadata::MetadataCommand::new(project, args.clone()).execute(ui)
            }
            Commands::Clean(args) => {
                super::clean::CleanCommand::new(project, args.clone()).execute(ui)
            }
            Commands::Completions(args) => {
                super::completions::CompletionsCommand::new(args.clone()).execute(ui)
            }
        }
    }
}
