//! ZIP export of a finished job's output directory.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Error, Result};
use crate::jobs::job::{DownloadJob, JobStatus};
use crate::jobs::registry::JobRegistry;

/// Name of the attachment served for a job archive.
pub fn archive_name(job_id: &str) -> String {
    format!("download_{}.zip", job_id)
}

/// Build an in-memory deflated archive of the job's directory.
///
/// Only regular files directly inside the directory are included, each
/// under its bare file name. A missing directory yields an empty archive.
pub fn build_zip(job: &DownloadJob) -> Result<Vec<u8>> {
    if job.status != JobStatus::Completed {
        return Err(Error::JobState {
            id: job.id.clone(),
            status: job.status.to_string(),
        });
    }

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    if job.output_dir.is_dir() {
        let mut entries = std::fs::read_dir(&job.output_dir)
            .map_err(|e| Error::filesystem(&job.output_dir, e))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .collect::<Vec<_>>();
        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let name = entry.file_name().to_string_lossy().into_owned();
            let path = entry.path();
            let data = std::fs::read(&path).map_err(|e| Error::filesystem(&path, e))?;

            zip.start_file(name, options)
                .map_err(|e| Error::Archive(e.to_string()))?;
            zip.write_all(&data)?;
        }
    } else {
        tracing::debug!(
            "Job {} has no output directory, returning empty archive",
            job.id
        );
    }

    let cursor = zip.finish().map_err(|e| Error::Archive(e.to_string()))?;
    Ok(cursor.into_inner())
}

/// Look up `job_id` and archive it off the async runtime.
pub async fn archive_job(registry: &JobRegistry, job_id: &str) -> Result<Vec<u8>> {
    let job = registry.get(job_id)?;
    tokio::task::spawn_blocking(move || build_zip(&job))
        .await
        .map_err(|e| Error::Archive(e.to_string()))?
}
