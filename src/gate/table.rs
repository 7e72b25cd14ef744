//! The resolved command table.
//!
//! Turns configured commands into runnable [`PackagingCommand`]s, attaching
//! gates and ordering dependencies.

use std::collections::{BTreeMap, HashSet};

use crate::assets::AssetManifest;
use crate::config::{is_distribution_command, CommandConfig, GateConfig, ManifestConfig};
use crate::error::{GateError, Result};

use super::builder::ShellBuilder;
use super::command::{PackagingCommand, RunContext, ShellCommand};
use super::gated::{ensure_assets, BuildCommand};

/// Every command known to a project, with the manifests they refer to.
#[derive(Debug, Clone)]
pub struct CommandTable {
    commands: BTreeMap<String, CommandConfig>,
    manifests: BTreeMap<String, ManifestConfig>,
}

impl CommandTable {
    pub fn from_config(config: &GateConfig) -> Self {
        Self {
            commands: config.command_table(),
            manifests: config.manifests.clone(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandConfig> {
        self.commands.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CommandConfig)> {
        self.commands.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.commands.keys().map(String::as_str).collect()
    }

    /// Resolve a manifest by name.
    pub fn manifest(&self, name: &str) -> Result<AssetManifest> {
        self.manifests
            .get(name)
            .map(|m| AssetManifest::from_config(name, m))
            .ok_or_else(|| GateError::ConfigValidationError {
                message: format!("Manifest '{}' does not exist", name),
            })
    }

    /// Build the runnable form of one command, gate included.
    ///
    /// With `force_strict` every gate refuses to build. Distribution
    /// commands are always strict and must be gated.
    pub fn build(&self, name: &str, force_strict: bool) -> Result<Box<dyn PackagingCommand>> {
        let config = self.get(name).ok_or_else(|| GateError::UnknownCommand {
            name: name.to_string(),
        })?;

        let base: Box<dyn PackagingCommand> = match &config.builds {
            Some(manifest) => Box::new(BuildCommand::new(
                name,
                self.manifest(manifest)?,
                ShellBuilder,
            )),
            None => Box::new(ShellCommand::new(name, config.run.clone())),
        };

        let distribution = is_distribution_command(name);
        match &config.gate {
            Some(gate) => Ok(Box::new(ensure_assets(
                base,
                gate.strict || force_strict || distribution,
                self.manifest(&gate.manifest)?,
                ShellBuilder,
            ))),
            None if distribution => Err(GateError::ConfigValidationError {
                message: format!("Distribution command '{}' has no asset gate", name),
            }),
            None => Ok(base),
        }
    }

    /// Order in which `requested` runs: each command after its
    /// dependencies, and every command at most once.
    pub fn plan(&self, requested: &[String]) -> Result<Vec<String>> {
        let explicit: HashSet<&str> = requested.iter().map(String::as_str).collect();
        let mut order = Vec::new();
        let mut done = HashSet::new();
        let mut stack = Vec::new();

        for name in requested {
            self.visit(name, None, &explicit, &mut done, &mut stack, &mut order)?;
        }

        Ok(order)
    }

    fn visit(
        &self,
        name: &str,
        required_by: Option<&str>,
        explicit: &HashSet<&str>,
        done: &mut HashSet<String>,
        stack: &mut Vec<String>,
        order: &mut Vec<String>,
    ) -> Result<()> {
        let config = self.get(name).ok_or_else(|| GateError::UnknownCommand {
            name: name.to_string(),
        })?;

        if let Some(parent) = required_by {
            if config.explicit_only && !explicit.contains(name) {
                return Err(GateError::CommandDisabled {
                    name: name.to_string(),
                    required_by: parent.to_string(),
                });
            }
        }

        if done.contains(name) {
            return Ok(());
        }

        if stack.iter().any(|s| s == name) {
            stack.push(name.to_string());
            return Err(GateError::ConfigValidationError {
                message: format!("Circular dependency detected: {}", stack.join(" -> ")),
            });
        }

        stack.push(name.to_string());
        for dep in &config.depends_on {
            self.visit(dep, Some(name), explicit, done, stack, order)?;
        }
        stack.pop();

        done.insert(name.to_string());
        order.push(name.to_string());
        Ok(())
    }

    /// Run `requested` commands in dependency order, stopping at the first
    /// failure. Returns the names that completed.
    pub fn run(
        &self,
        requested: &[String],
        force_strict: bool,
        ctx: &mut RunContext<'_>,
    ) -> Result<Vec<String>> {
        let order = self.plan(requested)?;
        tracing::debug!("Run order: {}", order.join(", "));

        let mut completed = Vec::with_capacity(order.len());
        for name in order {
            let command = self.build(&name, force_strict)?;
            command.run(ctx)?;
            tracing::info!("Finished {}", name);
            completed.push(name);
        }

        Ok(completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GateSpec;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn config() -> GateConfig {
        let mut config = GateConfig::default();
        config.package.name = "quantlab".to_string();
        config.manifests.insert(
            "assets".to_string(),
            ManifestConfig {
                paths: vec!["static/bundle.js".to_string()],
                build: Some("mkdir -p static && echo js > static/bundle.js".to_string()),
                ..Default::default()
            },
        );
        config.manifests.insert(
            "core".to_string(),
            ManifestConfig {
                paths: vec!["core.json".to_string()],
                build: Some("echo {} > core.json".to_string()),
                ..Default::default()
            },
        );
        for (name, line) in [
            ("build_py", "echo build_py >> log.txt"),
            ("sdist", "echo sdist >> log.txt"),
            ("bdist_egg", "echo bdist_egg >> log.txt"),
        ] {
            let mut command = config.command_table().remove(name).unwrap();
            command.run = Some(line.to_string());
            config.commands.insert(name.to_string(), command);
        }
        config
    }

    fn requested(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn log(temp: &TempDir) -> String {
        fs::read_to_string(temp.path().join("log.txt")).unwrap_or_default()
    }

    #[test]
    fn plan_orders_dependencies_first_and_once() {
        let mut config = config();
        config.commands.insert(
            "release".to_string(),
            CommandConfig {
                run: Some("true".to_string()),
                depends_on: requested(&["jsdeps", "sdist"]),
                ..Default::default()
            },
        );
        config.commands.get_mut("sdist").unwrap().depends_on = requested(&["jsdeps"]);
        let table = CommandTable::from_config(&config);

        let order = table.plan(&requested(&["release", "sdist"])).unwrap();
        assert_eq!(order, requested(&["jsdeps", "sdist", "release"]));
    }

    #[test]
    fn plan_rejects_unknown_command() {
        let table = CommandTable::from_config(&config());
        let err = table.plan(&requested(&["upload"])).unwrap_err();
        assert!(matches!(err, GateError::UnknownCommand { name } if name == "upload"));
    }

    #[test]
    fn explicit_only_command_reached_implicitly_is_disabled() {
        let mut config = config();
        config.commands.get_mut("sdist").unwrap().depends_on = requested(&["bdist_egg"]);
        let table = CommandTable::from_config(&config);

        let err = table.plan(&requested(&["sdist"])).unwrap_err();
        match err {
            GateError::CommandDisabled { name, required_by } => {
                assert_eq!(name, "bdist_egg");
                assert_eq!(required_by, "sdist");
            }
            other => panic!("unexpected error: {:?}", other),
        }

        assert!(table.plan(&requested(&["bdist_egg", "sdist"])).is_ok());
    }

    #[test]
    fn explicit_only_command_runs_when_requested() {
        let temp = TempDir::new().unwrap();
        let table = CommandTable::from_config(&config());
        let mut ui = MockUI::new();
        let mut ctx = RunContext::new(temp.path(), &mut ui);

        table.run(&requested(&["bdist_egg"]), false, &mut ctx).unwrap();
        assert_eq!(log(&temp), "bdist_egg\n");
    }

    #[test]
    fn plan_detects_cycles() {
        let mut config = config();
        config.commands.get_mut("sdist").unwrap().depends_on = requested(&["build_py"]);
        config.commands.get_mut("build_py").unwrap().depends_on = requested(&["sdist"]);
        let table = CommandTable::from_config(&config);

        let err = table.plan(&requested(&["sdist"])).unwrap_err();
        assert!(err.to_string().contains("sdist -> build_py -> sdist"));
    }

    #[test]
    fn strict_command_refuses_without_assets() {
        let temp = TempDir::new().unwrap();
        let table = CommandTable::from_config(&config());
        let mut ui = MockUI::new();
        let mut ctx = RunContext::new(temp.path(), &mut ui);

        let err = table.run(&requested(&["sdist"]), false, &mut ctx).unwrap_err();
        assert!(matches!(err, GateError::MissingAssets { .. }));
        assert!(!temp.path().join("static").exists());
        assert_eq!(log(&temp), "");
    }

    #[test]
    fn building_assets_first_unblocks_strict_command() {
        let temp = TempDir::new().unwrap();
        let table = CommandTable::from_config(&config());
        let mut ui = MockUI::new();
        let mut ctx = RunContext::new(temp.path(), &mut ui);

        let done = table
            .run(&requested(&["jsdeps", "sdist"]), false, &mut ctx)
            .unwrap();
        assert_eq!(done, requested(&["jsdeps", "sdist"]));
        assert_eq!(log(&temp), "sdist\n");
    }

    #[test]
    fn self_heal_command_builds_core() {
        let temp = TempDir::new().unwrap();
        let table = CommandTable::from_config(&config());
        let mut ui = MockUI::new();
        let mut ctx = RunContext::new(temp.path(), &mut ui);

        table.run(&requested(&["build_py"]), false, &mut ctx).unwrap();
        assert!(temp.path().join("core.json").exists());
        assert_eq!(log(&temp), "build_py\n");
    }

    #[test]
    fn force_strict_disables_self_heal() {
        let temp = TempDir::new().unwrap();
        let table = CommandTable::from_config(&config());
        let mut ui = MockUI::new();
        let mut ctx = RunContext::new(temp.path(), &mut ui);

        let err = table.run(&requested(&["build_py"]), true, &mut ctx).unwrap_err();
        assert!(matches!(err, GateError::MissingAssets { .. }));
        assert!(!temp.path().join("core.json").exists());
    }

    #[test]
    fn distribution_gate_is_strict_even_when_configured_otherwise() {
        let mut config = config();
        config.commands.get_mut("sdist").unwrap().gate = Some(GateSpec::self_heal("assets"));
        let temp = TempDir::new().unwrap();
        let table = CommandTable::from_config(&config);
        let mut ui = MockUI::new();
        let mut ctx = RunContext::new(temp.path(), &mut ui);

        let err = table.run(&requested(&["sdist"]), false, &mut ctx).unwrap_err();
        assert!(matches!(err, GateError::MissingAssets { .. }));
        assert!(!temp.path().join("static").exists());
        assert_eq!(log(&temp), "");
    }

    #[test]
    fn ungated_distribution_command_is_refused() {
        let mut config = config();
        config.manifests.remove("assets");
        config.commands.get_mut("sdist").unwrap().gate = None;
        let table = CommandTable::from_config(&config);

        let err = table.build("sdist", false).err().unwrap();
        assert!(matches!(err, GateError::ConfigValidationError { .. }));
    }

    #[test]
    fn gates_wrap_configured_commands() {
        let mut config = config();
        config.commands.insert(
            "docs".to_string(),
            CommandConfig {
                run: Some("echo docs >> log.txt".to_string()),
                gate: Some(GateSpec::self_heal("assets")),
                ..Default::default()
            },
        );
        let temp = TempDir::new().unwrap();
        let table = CommandTable::from_config(&config);
        let mut ui = MockUI::new();
        let mut ctx = RunContext::new(temp.path(), &mut ui);

        table.run(&requested(&["docs"]), false, &mut ctx).unwrap();
        assert!(temp.path().join("static/bundle.js").exists());
        assert_eq!(log(&temp), "docs\n");
    }
}
