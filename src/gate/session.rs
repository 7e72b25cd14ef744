//! One packaging invocation, start to finish.

use std::path::{Path, PathBuf};

use crate::config::{validate, GateConfig};
use crate::error::Result;
use crate::interpreter::check_interpreter;
use crate::ui::UserInterface;
use crate::workspace::remove_stale_files;

use super::command::RunContext;
use super::table::CommandTable;

/// Options for a packaging run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Commands to run, in order.
    pub commands: Vec<String>,

    /// Make every gate strict.
    pub force_strict: bool,
}

/// Ties configuration to the steps of a run:
///
/// 1. validate configuration
/// 2. check the interpreter, if one is configured
/// 3. remove stale packaging files
/// 4. run the requested commands through their gates
pub struct PackagingSession {
    config: GateConfig,
    project_root: PathBuf,
    table: CommandTable,
}

impl PackagingSession {
    pub fn new(config: GateConfig, project_root: &Path) -> Result<Self> {
        validate(&config)?;
        let table = CommandTable::from_config(&config);
        Ok(Self {
            config,
            project_root: project_root.to_path_buf(),
            table,
        })
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Run the requested commands. Returns the names that completed.
    pub fn run(&self, options: &RunOptions, ui: &mut dyn UserInterface) -> Result<Vec<String>> {
        // Fail on unknown or disabled commands before touching anything.
        self.table.plan(&options.commands)?;

        if let Some(interpreter) = &self.config.interpreter {
            let version =
                check_interpreter(interpreter, &self.config.package.name, &self.project_root)?;
            tracing::info!("Using {} {}", interpreter.program(), version);
        }

        for removed in remove_stale_files(&self.project_root, &self.config.stale_files)? {
            ui.message(&format!("Removed stale {}", removed));
        }

        let mut ctx = RunContext::new(&self.project_root, ui);
        self.table
            .run(&options.commands, options.force_strict, &mut ctx)
    }
}
