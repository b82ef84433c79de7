//! In-memory job table.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::{Error, Result};
use crate::fs::job_output_dir;
use crate::jobs::job::{DownloadJob, JobSnapshot};
use crate::scrape::LinkRecord;

/// Process-wide table of download jobs keyed by id.
///
/// `create`, `update` and the read accessors are the only way to touch a
/// job. After creation each entry is written by exactly one worker. Jobs are
/// kept for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct JobRegistry {
    jobs: Arc<RwLock<HashMap<String, DownloadJob>>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new pending job for `links` and return its id.
    pub fn create(&self, links: Vec<LinkRecord>, jobs_root: &Path) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        let job = DownloadJob::new(id.clone(), links, job_output_dir(jobs_root, &id));

        self.jobs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.clone(), job);

        tracing::info!("Created job {}", id);
        id
    }

    /// Clone of the full job record.
    pub fn get(&self, id: &str) -> Result<DownloadJob> {
        self.jobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
            .ok_or_else(|| Error::JobNotFound(id.to_string()))
    }

    /// Status view of a job, taken under a single read lock.
    pub fn snapshot(&self, id: &str) -> Result<JobSnapshot> {
        self.jobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .map(DownloadJob::snapshot)
            .ok_or_else(|| Error::JobNotFound(id.to_string()))
    }

    /// Apply `f` to the job under the write lock.
    pub fn update<T>(&self, id: &str, f: impl FnOnce(&mut DownloadJob) -> T) -> Result<T> {
        let mut jobs = self.jobs.write().unwrap_or_else(PoisonError::into_inner);
        let job = jobs
            .get_mut(id)
            .ok_or_else(|| Error::JobNotFound(id.to_string()))?;
        Ok(f(job))
    }

    pub fn len(&self) -> usize {
        self.jobs.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
