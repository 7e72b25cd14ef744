//! Command-line interface for assetgate.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{
    CheckArgs, CleanArgs, Cli, Commands, CompletionsArgs, ListArgs, MetadataArgs, RunArgs,
};
pub use commands::{Command, CommandDispatcher, CommandResult};
