//! Filesystem module.
//!
//! Provides:
//! - Path and directory management
//! - Filename derivation and sanitization

pub mod naming;
pub mod paths;

pub use naming::{filename_from_url, output_filename, sanitize_filename};
pub use paths::{display_path, ensure_dir, job_output_dir};
