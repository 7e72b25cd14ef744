//! Configuration loading, parsing, and validation for assetgate.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Layering of local overrides in [`merger`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use assetgate::config::{load_merged_config, validate};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let dir = temp.path().join(".assetgate");
//! fs::create_dir_all(&dir).unwrap();
//! fs::write(
//!     dir.join("config.yml"),
//!     "package:\n  name: quantlab\nmanifests:\n  assets:\n    paths: [static]\n    build: npm run build\n",
//! )
//! .unwrap();
//!
//! let config = load_merged_config(temp.path()).unwrap();
//! validate(&config).unwrap();
//! assert_eq!(config.package.name, "quantlab");
//! ```

pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

pub use schema::{
    is_distribution_command, CleanConfig, CommandConfig, Freshness, GateConfig, GateSpec,
    InterpreterConfig, ManifestConfig, PackageMetadata, ASSETS_MANIFEST, CORE_MANIFEST,
    DISTRIBUTION_COMMANDS,
};

pub use loader::{
    find_project_root, load_config, load_config_file, load_config_value, load_merged_config,
    parse_config, ConfigPaths, CONFIG_DIR,
};

pub use merger::{deep_merge, merge_configs};

pub use validator::{validate, validate_config, ValidationError};
