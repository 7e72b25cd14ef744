//! Asset build delegates.

use crate::assets::AssetManifest;
use crate::error::{GateError, Result};
use crate::shell::{execute, CommandOptions};

use super::command::RunContext;

/// Something that can produce the assets of a manifest.
///
/// The gate calls this at most once per check and verifies the result
/// itself; implementations only report whether the build ran cleanly.
pub trait AssetBuilder {
    fn build(&self, manifest: &AssetManifest, ctx: &mut RunContext<'_>) -> Result<()>;
}

impl<B: AssetBuilder + ?Sized> AssetBuilder for &B {
    fn build(&self, manifest: &AssetManifest, ctx: &mut RunContext<'_>) -> Result<()> {
        (**self).build(manifest, ctx)
    }
}

impl<B: AssetBuilder + ?Sized> AssetBuilder for Box<B> {
    fn build(&self, manifest: &AssetManifest, ctx: &mut RunContext<'_>) -> Result<()> {
        (**self).build(manifest, ctx)
    }
}

/// Builds assets by running the manifest's `build` shell line.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellBuilder;

impl AssetBuilder for ShellBuilder {
    fn build(&self, manifest: &AssetManifest, ctx: &mut RunContext<'_>) -> Result<()> {
        let Some(line) = &manifest.build else {
            return Err(GateError::AssetBuildFailed {
                manifest: manifest.name.clone(),
                message: "no build command configured".to_string(),
            });
        };

        let options = if ctx.ui.output_mode().shows_command_output() {
            CommandOptions::inherited(ctx.project_root())
        } else {
            CommandOptions::captured(ctx.project_root())
        };

        tracing::info!("Building {} assets: {}", manifest.name, line);
        let result = execute(line, &options)?;

        if result.success {
            Ok(())
        } else {
            let detail = result.stderr.lines().last().unwrap_or("").trim().to_string();
            let mut message = format!("'{}' exited with {:?}", line, result.exit_code);
            if !detail.is_empty() {
                message.push_str(&format!(": {}", detail));
            }
            Err(GateError::AssetBuildFailed {
                manifest: manifest.name.clone(),
                message,
            })
        }
    }
}
