//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations and carries the global project
//! and config overrides.

pub mod check;
pub mod clean;
pub mod completions;
pub mod dispatcher;
pub mod list;
pub mod metadata;
pub mod run;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
