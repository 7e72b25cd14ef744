//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// assetgate - Refuse to package a project whose built assets are missing.
#[derive(Debug, Parser)]
#[command(name = "assetgate")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides .assetgate/config.yml, no local merge)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show verbose output, streaming command output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run packaging commands through their asset gates
    Run(RunArgs),

    /// Report whether every asset manifest is ready, without building
    Check(CheckArgs),

    /// List packaging commands and their gates
    List(ListArgs),

    /// Show package metadata
    Metadata(MetadataArgs),

    /// Remove dependency directories and untracked files
    Clean(CleanArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RunArgs {
    /// Commands to run, in order (e.g. jsdeps sdist)
    #[arg(required = true, value_name = "COMMAND")]
    pub commands: Vec<String>,

    /// Make every gate strict; never build assets on demand
    #[arg(long, env = "ASSETGATE_STRICT")]
    pub strict: bool,
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CheckArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `metadata` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct MetadataArgs {
    /// Output as JSON
    #[arg(long, conflicts_with = "yaml")]
    pub json: bool,

    /// Output as YAML
    #[arg(long)]
    pub yaml: bool,
}

/// Arguments for the `clean` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CleanArgs {
    /// List what would be removed without removing it
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
