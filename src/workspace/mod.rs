//! Project tree housekeeping: stale packaging files and cleanup.

pub mod clean;
pub mod stale;

pub use clean::{clean, find_prunable, CleanReport};
pub use stale::remove_stale_files;
