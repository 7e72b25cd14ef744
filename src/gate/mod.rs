//! Packaging commands and the asset-readiness gate.
//!
//! - [`command`] - The [`PackagingCommand`] trait and shell-backed commands
//! - [`builder`] - Asset build delegates
//! - [`gated`] - [`ensure_assets`] and the gate policies
//! - [`table`] - Resolution of configured commands and dependencies
//! - [`session`] - A complete packaging run
//!
//! # Example
//!
//! ```
//! use assetgate::assets::AssetManifest;
//! use assetgate::config::Freshness;
//! use assetgate::gate::{ensure_assets, GatePolicy, ShellBuilder, ShellCommand};
//!
//! let manifest = AssetManifest {
//!     name: "assets".to_string(),
//!     paths: vec!["quantlab/static/main.bundle.js".to_string()],
//!     sources: vec![],
//!     freshness: Freshness::Exists,
//!     build: Some("npm run build".to_string()),
//! };
//! let sdist = ShellCommand::new("sdist", Some("python setup.py sdist".to_string()));
//! let gated = ensure_assets(sdist, true, manifest, ShellBuilder);
//! assert_eq!(gated.policy(), GatePolicy::Strict);
//! ```

pub mod builder;
pub mod command;
pub mod gated;
pub mod session;
pub mod table;

pub use builder::{AssetBuilder, ShellBuilder};
pub use command::{PackagingCommand, RunContext, ShellCommand};
pub use gated::{build_and_verify, ensure_assets, BuildCommand, GatePolicy, Gated};
pub use session::{PackagingSession, RunOptions};
pub use table::CommandTable;
