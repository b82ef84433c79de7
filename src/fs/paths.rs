//! Path and directory management.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(|e| Error::filesystem(path, e))?;
    }
    Ok(())
}

/// Output directory for a web download job.
pub fn job_output_dir(root: &Path, job_id: &str) -> PathBuf {
    root.join(job_id)
}

/// Absolute form of `path` for display, falling back to the path itself.
pub fn display_path(path: &Path) -> String {
    std::path::absolute(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}
