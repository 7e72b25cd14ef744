//! List command implementation.
//!
//! The `assetgate list` command shows every packaging command with its
//! gate, dependencies, and restrictions.

use std::collections::BTreeMap;

use crate::cli::args::ListArgs;
use crate::config::CommandConfig;
use crate::error::{GateError, Result};
use crate::gate::CommandTable;
use crate::ui::theme::GateTheme;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, ProjectContext};

/// The list command implementation.
pub struct ListCommand {
    project: ProjectContext,
    args: ListArgs,
}

impl ListCommand {
    /// Create a new list command.
    pub fn new(project: ProjectContext, args: ListArgs) -> Self {
        Self { project, args }
    }
}

fn policy(command: &CommandConfig) -> String {
    match (&command.gate, &command.builds) {
        (Some(gate), _) if gate.strict => format!("strict gate on {}", gate.manifest),
        (Some(gate), _) => format!("self-heal gate on {}", gate.manifest),
        (None, Some(manifest)) => format!("builds {}", manifest),
        (None, None) => "ungated".to_string(),
    }
}

impl Command for ListCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = self.project.load_config()?;
        let table = CommandTable::from_config(&config);

        if self.args.json {
            let commands: BTreeMap<_, _> = table.iter().collect();
            let json =
                serde_json::to_string_pretty(&commands).map_err(|e| GateError::Other(e.into()))?;
            ui.message(&json);
            return Ok(CommandResult::success());
        }

        let theme = GateTheme::new();
        ui.message(&format!("  {}", theme.header.apply_to("Commands:")));
        for (name, command) in table.iter() {
            let mut detail = format!(" {}", theme.dim.apply_to(format!("({})", policy(command))));
            if command.explicit_only {
                detail.push_str(&format!(" {}", theme.warning.apply_to("[explicit only]")));
            }
            ui.message(&format!("    {}{}", theme.highlight.apply_to(name), detail));

            if let Some(run) = &command.run {
                ui.message(&format!("      {}", theme.command.apply_to(run)));
            }
            if let Some(desc) = &command.description {
                ui.message(&format!("      {}", theme.dim.apply_to(desc)));
            }
            if !command.depends_on.is_empty() {
                ui.message(&format!(
                    "      {} {}",
                    theme.dim.apply_to("└── depends on:"),
                    theme.dim.apply_to(command.depends_on.join(", "))
                ));
            }
        }

        Ok(CommandResult::success())
    }
}
