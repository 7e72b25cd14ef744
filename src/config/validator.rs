//! Configuration validation rules.
//!
//! This module validates configuration for correctness:
//! - Manifests must list at least one path
//! - Freshness policies other than `exists` need sources
//! - Distribution commands must be gated strictly
//! - Gates and builds must reference existing manifests that can be built
//! - A command either runs a shell line or builds a manifest, not both
//! - Dependencies must reference existing commands, without cycles
//! - Entry points must have the `module:function` shape
//! - Interpreter minimums must be `MAJOR.MINOR` versions

use crate::config::schema::{
    is_distribution_command, CommandConfig, Freshness, GateConfig, ASSETS_MANIFEST,
};
use crate::error::{GateError, Result};
use crate::interpreter::Version;
use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

static ENTRY_POINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_.]*:[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex")
});

/// Validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    fn new(rule: &str, message: String) -> Self {
        Self {
            rule: rule.to_string(),
            message,
        }
    }
}

/// Validate a configuration and return all errors.
///
/// Collects every error rather than stopping at the first one.
pub fn validate_config(config: &GateConfig) -> Vec<ValidationError> {
    let table = config.command_table();
    let mut errors = Vec::new();

    errors.extend(validate_package(config));
    errors.extend(validate_interpreter(config));
    errors.extend(validate_manifests(config));
    errors.extend(validate_commands(config, &table));
    errors.extend(validate_distribution(&table));
    errors.extend(validate_dependencies(&table));

    errors
}

fn validate_package(config: &GateConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.package.name.trim().is_empty() {
        errors.push(ValidationError::new(
            "missing-package-name",
            "package.name must not be empty".to_string(),
        ));
    }

    for (script, target) in &config.package.entry_points {
        if !ENTRY_POINT.is_match(target) {
            errors.push(ValidationError::new(
                "invalid-entry-point",
                format!(
                    "Entry point '{}' must look like 'module:function', got '{}'",
                    script, target
                ),
            ));
        }
    }

    errors
}

fn validate_interpreter(config: &GateConfig) -> Vec<ValidationError> {
    let Some(interpreter) = &config.interpreter else {
        return Vec::new();
    };

    let mut errors = Vec::new();

    if interpreter.command.trim().is_empty() {
        errors.push(ValidationError::new(
            "missing-interpreter-command",
            "interpreter.command must not be empty".to_string(),
        ));
    }

    if interpreter.minimums.is_empty() {
        errors.push(ValidationError::new(
            "invalid-minimum",
            "interpreter.minimums must list at least one version".to_string(),
        ));
    }

    for minimum in &interpreter.minimums {
        if Version::parse(minimum).is_none() {
            errors.push(ValidationError::new(
                "invalid-minimum",
                format!("Interpreter minimum '{}' is not a version", minimum),
            ));
        }
    }

    errors
}

fn validate_manifests(config: &GateConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (name, manifest) in &config.manifests {
        if manifest.paths.is_empty() {
            errors.push(ValidationError::new(
                "empty-manifest",
                format!("Manifest '{}' must list at least one path", name),
            ));
        }

        if manifest.freshness != Freshness::Exists && manifest.sources.is_empty() {
            errors.push(ValidationError::new(
                "missing-sources",
                format!(
                    "Manifest '{}' uses {:?} freshness but lists no sources",
                    name, manifest.freshness
                ),
            ));
        }
    }

    errors
}

fn validate_commands(
    config: &GateConfig,
    table: &BTreeMap<String, CommandConfig>,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let buildable = |manifest: &str| {
        config
            .manifests
            .get(manifest)
            .is_some_and(|m| m.build.is_some())
    };

    for (name, command) in table {
        if command.run.is_none()
            && command.gate.is_none()
            && command.builds.is_none()
            && command.depends_on.is_empty()
        {
            errors.push(ValidationError::new(
                "empty-command",
                format!("Command '{}' has nothing to do", name),
            ));
        }

        if let Some(gate) = &command.gate {
            if !config.manifests.contains_key(&gate.manifest) {
                errors.push(ValidationError::new(
                    "unknown-manifest",
                    format!(
                        "Command '{}' is gated on manifest '{}' which does not exist",
                        name, gate.manifest
                    ),
                ));
            } else if !gate.strict && !buildable(&gate.manifest) {
                errors.push(ValidationError::new(
                    "missing-build",
                    format!(
                        "Command '{}' builds '{}' on demand but the manifest has no build command",
                        name, gate.manifest
                    ),
                ));
            }
        }

        if command.builds.is_some() && command.run.is_some() {
            errors.push(ValidationError::new(
                "conflicting-command",
                format!("Command '{}' sets both 'run' and 'builds'", name),
            ));
        }

        if let Some(manifest) = &command.builds {
            if !config.manifests.contains_key(manifest) {
                errors.push(ValidationError::new(
                    "unknown-manifest",
                    format!(
                        "Command '{}' builds manifest '{}' which does not exist",
                        name, manifest
                    ),
                ));
            } else if !buildable(manifest) {
                errors.push(ValidationError::new(
                    "missing-build",
                    format!(
                        "Command '{}' builds '{}' but the manifest has no build command",
                        name, manifest
                    ),
                ));
            }
        }

        for dep in &command.depends_on {
            if !table.contains_key(dep) {
                errors.push(ValidationError::new(
                    "unknown-command",
                    format!("Command '{}' depends on '{}' which does not exist", name, dep),
                ));
            }
        }
    }

    errors
}

fn validate_distribution(table: &BTreeMap<String, CommandConfig>) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (name, command) in table.iter().filter(|(n, _)| is_distribution_command(n)) {
        match &command.gate {
            None => errors.push(ValidationError::new(
                "ungated-distribution",
                format!(
                    "Distribution command '{}' has no asset gate; define an '{}' manifest",
                    name, ASSETS_MANIFEST
                ),
            )),
            Some(gate) if !gate.strict => errors.push(ValidationError::new(
                "non-strict-distribution",
                format!(
                    "Distribution command '{}' must gate '{}' with strict: true",
                    name, gate.manifest
                ),
            )),
            Some(_) => {}
        }
    }

    errors
}

fn validate_dependencies(table: &BTreeMap<String, CommandConfig>) -> Vec<ValidationError> {
    let mut visited = HashSet::new();
    let mut rec_stack = HashSet::new();
    let mut path = Vec::new();

    for name in table.keys() {
        if let Some(cycle) = detect_cycle(name, table, &mut visited, &mut rec_stack, &mut path) {
            // One cycle is enough to act on.
            return vec![ValidationError::new(
                "circular-dependency",
                format!("Circular dependency detected: {}", cycle),
            )];
        }
    }

    Vec::new()
}

fn detect_cycle(
    name: &str,
    table: &BTreeMap<String, CommandConfig>,
    visited: &mut HashSet<String>,
    rec_stack: &mut HashSet<String>,
    path: &mut Vec<String>,
) -> Option<String> {
    if rec_stack.contains(name) {
        let start = path.iter().position(|s| s == name).unwrap_or(0);
        return Some(format!("{} -> {}", path[start..].join(" -> "), name));
    }

    if !visited.insert(name.to_string()) {
        return None;
    }

    rec_stack.insert(name.to_string());
    path.push(name.to_string());

    if let Some(command) = table.get(name) {
        for dep in &command.depends_on {
            if let Some(cycle) = detect_cycle(dep, table, visited, rec_stack, path) {
                return Some(cycle);
            }
        }
    }

    path.pop();
    rec_stack.remove(name);
    None
}

/// Validate and return Result (for convenience).
///
/// # Errors
///
/// Returns `ConfigValidationError` if any validation rules fail.
pub fn validate(config: &GateConfig) -> Result<()> {
    let errors = validate_config(config);

    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<_> = errors.iter().map(|e| e.message.clone()).collect();
        Err(GateError::ConfigValidationError {
            message: messages.join("; "),
        })
    }
}
