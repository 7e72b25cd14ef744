//! Asset manifests, freshness policies, and build stamps.
//!
//! - [`manifest`] - Manifest definition and readiness checks
//! - [`freshness`] - mtime and content-digest staleness detection
//! - [`stamp`] - Records of the last successful build

pub mod freshness;
pub mod manifest;
pub mod stamp;

pub use freshness::{collect_files, source_digest};
pub use manifest::{AssetManifest, AssetStatus};
pub use stamp::BuildStamp;
