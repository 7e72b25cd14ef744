//! The asset-readiness gate.
//!
//! [`ensure_assets`] wraps a packaging command so that it only runs once the
//! assets it depends on are present and current:
//!
//! - ready: the wrapped command runs unchanged, no build
//! - not ready, self-heal: build once, re-check, then run or fail
//! - not ready, strict: fail without building
//!
//! Distribution commands are strict so a package never ships with assets
//! that were not already built for it.

use crate::assets::{AssetManifest, AssetStatus};
use crate::error::{GateError, Result};

use super::builder::AssetBuilder;
use super::command::{PackagingCommand, RunContext};

/// What a gate does when assets are not ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePolicy {
    /// Fail immediately.
    Strict,
    /// Build once, then re-check.
    SelfHeal,
}

impl GatePolicy {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            GatePolicy::Strict
        } else {
            GatePolicy::SelfHeal
        }
    }
}

/// A packaging command behind an asset gate.
#[derive(Debug)]
pub struct Gated<C, B> {
    inner: C,
    manifest: AssetManifest,
    policy: GatePolicy,
    builder: B,
}

/// Wrap `command` so it runs only when `manifest` is ready.
pub fn ensure_assets<C, B>(
    command: C,
    strict: bool,
    manifest: AssetManifest,
    builder: B,
) -> Gated<C, B>
where
    C: PackagingCommand,
    B: AssetBuilder,
{
    Gated {
        inner: command,
        manifest,
        policy: GatePolicy::from_strict(strict),
        builder,
    }
}

impl<C, B> Gated<C, B> {
    pub fn policy(&self) -> GatePolicy {
        self.policy
    }
}

impl<C, B> PackagingCommand for Gated<C, B>
where
    C: PackagingCommand,
    B: AssetBuilder,
{
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn run(&self, ctx: &mut RunContext<'_>) -> Result<()> {
        let status = self.manifest.check(ctx.project_root())?;
        tracing::debug!(
            "Gate for {} on {}: {}",
            self.name(),
            self.manifest.name,
            status.describe()
        );

        if !status.is_ready() {
            match self.policy {
                GatePolicy::Strict => return Err(refusal(self.name(), &self.manifest, status)),
                GatePolicy::SelfHeal => {
                    ctx.ui.warning(&format!(
                        "{}: {}; building before {}",
                        self.manifest.name,
                        status.describe(),
                        self.name()
                    ));
                    build_and_verify(&self.manifest, &self.builder, ctx)?;
                }
            }
        }

        self.inner.run(ctx)
    }
}

fn refusal(command: &str, manifest: &AssetManifest, status: AssetStatus) -> GateError {
    match status {
        AssetStatus::Missing { paths } => GateError::MissingAssets {
            command: command.to_string(),
            manifest: manifest.name.clone(),
            missing: paths,
        },
        AssetStatus::Stale { reason } => GateError::StaleAssets {
            command: command.to_string(),
            manifest: manifest.name.clone(),
            reason,
        },
        AssetStatus::Ready => GateError::Other(anyhow::anyhow!(
            "refused to run {} with ready assets",
            command
        )),
    }
}

/// Run the builder once and confirm the manifest is ready afterwards.
///
/// Once every path exists the build is recorded as the new freshness
/// baseline, then the full check runs.
pub fn build_and_verify<B: AssetBuilder + ?Sized>(
    manifest: &AssetManifest,
    builder: &B,
    ctx: &mut RunContext<'_>,
) -> Result<()> {
    let mut spinner = ctx
        .ui
        .start_spinner(&format!("Building {}", manifest.name));

    if let Err(e) = builder.build(manifest, ctx) {
        spinner.finish_error(&format!("Building {} assets failed", manifest.name));
        return Err(match e {
            GateError::AssetBuildFailed { .. } => e,
            other => GateError::AssetBuildFailed {
                manifest: manifest.name.clone(),
                message: other.to_string(),
            },
        });
    }

    let missing = manifest.missing(ctx.project_root());
    if !missing.is_empty() {
        spinner.finish_error(&format!("{} assets still missing", manifest.name));
        return Err(GateError::AssetBuildFailed {
            manifest: manifest.name.clone(),
            message: format!("build finished but assets are missing: {}", missing.join(", ")),
        });
    }

    manifest.record_build(ctx.project_root())?;
    let status = manifest.check(ctx.project_root())?;
    if !status.is_ready() {
        spinner.finish_error(&format!("{} assets still not ready", manifest.name));
        return Err(GateError::AssetBuildFailed {
            manifest: manifest.name.clone(),
            message: format!("build finished but assets are {}", status.describe()),
        });
    }

    spinner.finish_success(&format!("Built {} assets", manifest.name));
    Ok(())
}

/// A command that builds a manifest unconditionally and verifies it.
#[derive(Debug)]
pub struct BuildCommand<B> {
    name: String,
    manifest: AssetManifest,
    builder: B,
}

impl<B: AssetBuilder> BuildCommand<B> {
    pub fn new(name: &str, manifest: AssetManifest, builder: B) -> Self {
        Self {
            name: name.to_string(),
            manifest,
            builder,
        }
    }
}

impl<B: AssetBuilder> PackagingCommand for BuildCommand<B> {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, ctx: &mut RunContext<'_>) -> Result<()> {
        build_and_verify(&self.manifest, &self.builder, ctx)
    }
}
