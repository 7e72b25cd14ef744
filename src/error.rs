//! Error types for assetgate operations.
//!
//! This module defines [`GateError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `GateError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `GateError::Other`) for unexpected errors
//! - Every error is terminal for the invoking process; nothing is retried

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for assetgate operations.
#[derive(Debug, Error)]
pub enum GateError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// The interpreter reported a version outside the supported range.
    #[error("{package} requires {interpreter} version {required}; found {found}")]
    UnsupportedInterpreter {
        package: String,
        interpreter: String,
        found: String,
        required: String,
    },

    /// The interpreter could not be run or its version could not be read.
    #[error("Could not determine version of '{interpreter}': {message}")]
    InterpreterVersionUnknown {
        interpreter: String,
        message: String,
    },

    /// Required assets are absent and the command runs in strict mode.
    #[error("Missing assets for '{command}' ({manifest}): {}", missing.join(", "))]
    MissingAssets {
        command: String,
        manifest: String,
        missing: Vec<String>,
    },

    /// Assets exist but are out of date and the command runs in strict mode.
    #[error("Stale assets for '{command}' ({manifest}): {reason}")]
    StaleAssets {
        command: String,
        manifest: String,
        reason: String,
    },

    /// The asset build delegate failed or left assets unready.
    #[error("Asset build for '{manifest}' failed: {message}")]
    AssetBuildFailed { manifest: String, message: String },

    /// Shell command failed.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// No packaging command with this name is configured.
    #[error("Unknown command: {name}")]
    UnknownCommand { name: String },

    /// An explicit-only command was reached implicitly.
    #[error("Command '{name}' can only be run explicitly (required by '{required_by}')")]
    CommandDisabled { name: String, required_by: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GateError {
    /// Process exit code for this error.
    ///
    /// A missing configuration exits with 2 so scripts can tell "not set
    /// up" apart from a failed gate; everything else exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            GateError::ConfigNotFound { .. } => 2,
            _ => 1,
        }
    }
}

/// Result type alias for assetgate operations.
pub type Result<T> = std::result::Result<T, GateError>;
