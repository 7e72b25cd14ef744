//! assetgate - Asset-readiness gate for packaging commands.
//!
//! Projects that ship built front-end assets inside a Python distribution
//! must not publish a package whose assets were never built. assetgate wraps
//! each packaging command with a gate that checks a manifest of expected
//! outputs first. Development commands build missing assets on demand;
//! distribution commands refuse to run without them.
//!
//! # Modules
//!
//! - [`assets`] - Asset manifests, freshness policies, and build stamps
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, parsing, and validation
//! - [`error`] - Error types and result aliases
//! - [`gate`] - Packaging commands, gates, and the command table
//! - [`interpreter`] - Interpreter version check
//! - [`shell`] - Shell command execution
//! - [`ui`] - Spinners and terminal output
//! - [`workspace`] - Stale file removal and project cleanup
//!
//! # Example
//!
//! ```
//! use assetgate::interpreter::{SupportPolicy, Version};
//!
//! let policy = SupportPolicy::default();
//! assert!(policy.supports(Version::new(2, 7, 18)));
//! assert!(!policy.supports(Version::new(3, 2, 0)));
//! ```
//!
//! For file-based config loading, see the integration tests.

pub mod assets;
pub mod cli;
pub mod config;
pub mod error;
pub mod gate;
pub mod interpreter;
pub mod shell;
pub mod ui;
pub mod workspace;

pub use error::{GateError, Result};
