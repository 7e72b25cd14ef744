//! Configuration schema definitions for assetgate.
//!
//! This module contains all the struct definitions that map to
//! the YAML configuration file format.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of the manifest that distribution commands are gated on.
pub const ASSETS_MANIFEST: &str = "assets";

/// Name of the manifest that development builds are gated on.
pub const CORE_MANIFEST: &str = "core";

/// Commands that produce a distributable package. Their gate is always
/// strict.
pub const DISTRIBUTION_COMMANDS: &[&str] = &["sdist", "bdist_wheel"];

/// Whether `name` produces a distributable package.
pub fn is_distribution_command(name: &str) -> bool {
    DISTRIBUTION_COMMANDS.contains(&name)
}

/// Root configuration structure for `.assetgate/config.yml`.
///
/// Loaded once at process start and passed explicitly to whatever needs it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Package metadata (pure data, displayed by `assetgate metadata`)
    pub package: PackageMetadata,

    /// Interpreter version check run before packaging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpreter: Option<InterpreterConfig>,

    /// Named asset manifests
    #[serde(default)]
    pub manifests: BTreeMap<String, ManifestConfig>,

    /// Packaging command overrides and additions
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub commands: BTreeMap<String, CommandConfig>,

    /// Files removed before packaging so file lists are recomputed
    #[serde(default = "default_stale_files")]
    pub stale_files: Vec<String>,

    /// Settings for `assetgate clean`
    pub clean: CleanConfig,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            package: PackageMetadata::default(),
            interpreter: None,
            manifests: BTreeMap::new(),
            commands: BTreeMap::new(),
            stale_files: default_stale_files(),
            clean: CleanConfig::default(),
        }
    }
}

fn default_stale_files() -> Vec<String> {
    vec!["MANIFEST".to_string()]
}

fn is_false(v: &bool) -> bool {
    !v
}

impl GateConfig {
    /// Resolve the full command table.
    ///
    /// Starts from the built-in packaging commands, then overlays each
    /// command defined under `commands:` field by field. Fields a
    /// configured command leaves unset keep their built-in value.
    pub fn command_table(&self) -> BTreeMap<String, CommandConfig> {
        let mut table = self.default_commands();
        for (name, command) in &self.commands {
            table
                .entry(name.clone())
                .and_modify(|existing| existing.overlay(command))
                .or_insert_with(|| command.clone());
        }
        table
    }

    /// Built-in commands mirroring the standard packaging entry points.
    ///
    /// Gates are only attached when the manifest they refer to exists.
    fn default_commands(&self) -> BTreeMap<String, CommandConfig> {
        let python = self
            .interpreter
            .as_ref()
            .map(|i| i.program().to_string())
            .unwrap_or_else(|| "python".to_string());
        let has = |name: &str| self.manifests.contains_key(name);
        let setup = |name: &str| Some(format!("{} setup.py {}", python, name));

        let mut table = BTreeMap::new();

        for name in ["build_py", "build_ext"] {
            table.insert(
                name.to_string(),
                CommandConfig {
                    description: Some(format!("Development build ({})", name)),
                    run: setup(name),
                    gate: has(CORE_MANIFEST).then(|| GateSpec::self_heal(CORE_MANIFEST)),
                    ..Default::default()
                },
            );
        }

        for name in ["sdist", "bdist_wheel"] {
            table.insert(
                name.to_string(),
                CommandConfig {
                    description: Some(format!("Distribution build ({})", name)),
                    run: setup(name),
                    gate: has(ASSETS_MANIFEST).then(|| GateSpec::strict(ASSETS_MANIFEST)),
                    ..Default::default()
                },
            );
        }

        table.insert(
            "bdist_egg".to_string(),
            CommandConfig {
                description: Some("Egg build, only when requested by name".to_string()),
                run: setup("bdist_egg"),
                explicit_only: true,
                ..Default::default()
            },
        );

        if has(ASSETS_MANIFEST) {
            table.insert(
                "jsdeps".to_string(),
                CommandConfig {
                    description: Some("Build front-end assets".to_string()),
                    builds: Some(ASSETS_MANIFEST.to_string()),
                    ..Default::default()
                },
            );
        }

        if has(CORE_MANIFEST) {
            table.insert(
                "coredeps".to_string(),
                CommandConfig {
                    description: Some("Build core data".to_string()),
                    builds: Some(CORE_MANIFEST.to_string()),
                    ..Default::default()
                },
            );
        }

        table
    }
}

/// Package metadata. Carries no behaviour beyond validation and display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageMetadata {
    /// Distribution name
    pub name: String,

    /// Version label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// One-line description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// License identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,

    /// Project home page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,

    /// Console scripts: script name to `module:function`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub entry_points: BTreeMap<String, String>,

    /// Runtime requirements with version bounds
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub install_requires: Vec<String>,

    /// Optional requirement groups
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extras_require: BTreeMap<String, Vec<String>>,
}

/// Interpreter version check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterpreterConfig {
    /// Shell command that prints the interpreter version
    pub command: String,

    /// Lowest supported version per major series
    #[serde(default = "default_minimums")]
    pub minimums: Vec<String>,
}

fn default_minimums() -> Vec<String> {
    vec!["2.7".to_string(), "3.3".to_string()]
}

impl InterpreterConfig {
    /// Program name, the first word of the version command.
    pub fn program(&self) -> &str {
        self.command.split_whitespace().next().unwrap_or("python")
    }
}

/// How to decide whether existing assets are current.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Freshness {
    /// Existence of every path is sufficient.
    #[default]
    Exists,
    /// Stale when any source is newer than the oldest asset file.
    Mtime,
    /// Stale when the source digest differs from the last build's digest.
    Hash,
}

/// A named set of built assets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    /// Expected outputs (files or directories, relative to project root)
    pub paths: Vec<String>,

    /// Inputs whose changes make the outputs stale
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,

    /// Freshness policy
    pub freshness: Freshness,

    /// Shell command that builds the assets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build: Option<String>,
}

/// Gate attached to a packaging command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateSpec {
    /// Manifest the command requires
    pub manifest: String,

    /// Fail instead of building when assets are not ready
    #[serde(default, skip_serializing_if = "is_false")]
    pub strict: bool,
}

impl GateSpec {
    /// A gate that refuses to build.
    pub fn strict(manifest: &str) -> Self {
        Self {
            manifest: manifest.to_string(),
            strict: true,
        }
    }

    /// A gate that builds missing assets once.
    pub fn self_heal(manifest: &str) -> Self {
        Self {
            manifest: manifest.to_string(),
            strict: false,
        }
    }
}

/// A packaging command.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Shell command to execute
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run: Option<String>,

    /// Asset gate checked before `run`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gate: Option<GateSpec>,

    /// Manifest this command builds unconditionally
    #[serde(skip_serializing_if = "Option::is_none")]
    pub builds: Option<String>,

    /// Commands that run first, each through its own gate
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,

    /// Refuse to run unless named on the command line
    #[serde(default, skip_serializing_if = "is_false")]
    pub explicit_only: bool,
}

impl CommandConfig {
    /// Apply the fields `other` sets on top of `self`.
    ///
    /// `run` and `builds` are alternatives and are replaced together when
    /// either is set. `explicit_only` can be switched on but not off.
    pub fn overlay(&mut self, other: &CommandConfig) {
        if other.description.is_some() {
            self.description = other.description.clone();
        }
        if other.run.is_some() || other.builds.is_some() {
            self.run = other.run.clone();
            self.builds = other.builds.clone();
        }
        if other.gate.is_some() {
            self.gate = other.gate.clone();
        }
        if !other.depends_on.is_empty() {
            self.depends_on = other.depends_on.clone();
        }
        self.explicit_only |= other.explicit_only;
    }
}

/// Settings for `assetgate clean`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanConfig {
    /// Directory names removed wherever they occur
    pub prune_dirs: Vec<String>,

    /// Command run in the project root after pruning
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            prune_dirs: vec!["node_modules".to_string()],
            command: Some("git clean -dfx".to_string()),
        }
    }
}
