//! Download job representation.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::scrape::link::truncate_chars;
use crate::scrape::LinkRecord;

/// Maximum number of characters of a link label shown as the current file.
pub const CURRENT_FILE_LIMIT: usize = 50;

/// Lifecycle state of a download job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Pending,
    Scraping,
    Downloading,
    Completed,
    Failed,
}

impl JobStatus {
    /// Whether the job has reached a final state.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Whether moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        use JobStatus::*;
        match (self, next) {
            (_, Failed) => !self.is_terminal(),
            (Pending, Scraping) | (Pending, Downloading) => true,
            (Scraping, Downloading) | (Scraping, Completed) => true,
            (Downloading, Completed) => true,
            _ => false,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Scraping => write!(f, "scraping"),
            JobStatus::Downloading => write!(f, "downloading"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

/// One tracked download run.
#[derive(Debug, Clone)]
pub struct DownloadJob {
    pub id: String,
    pub status: JobStatus,
    pub links: Vec<LinkRecord>,
    /// Number of files attempted so far. Never decreases.
    pub progress: usize,
    pub total: usize,
    pub current_file: String,
    pub output_dir: PathBuf,
    pub error: Option<String>,

    pub successful: usize,
    pub skipped: usize,
    pub failed: usize,
    pub failed_urls: Vec<String>,

    pub created_at: DateTime<Utc>,
}

impl DownloadJob {
    /// Create a pending job for `links`.
    pub fn new(id: String, links: Vec<LinkRecord>, output_dir: PathBuf) -> Self {
        Self {
            id,
            status: JobStatus::Pending,
            total: links.len(),
            links,
            progress: 0,
            current_file: String::new(),
            output_dir,
            error: None,
            successful: 0,
            skipped: 0,
            failed: 0,
            failed_urls: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Move to `next` if the transition is legal. Returns whether it happened.
    pub fn transition(&mut self, next: JobStatus) -> bool {
        if self.status.can_transition_to(next) {
            tracing::debug!("Job {}: {} -> {}", self.id, self.status, next);
            self.status = next;
            true
        } else {
            tracing::warn!(
                "Job {}: ignoring illegal transition {} -> {}",
                self.id,
                self.status,
                next
            );
            false
        }
    }

    /// Record that item `index` is about to be attempted.
    pub fn begin_item(&mut self, index: usize, label: &str) {
        self.current_file = truncate_chars(label, CURRENT_FILE_LIMIT);
        self.progress = self.progress.max(index);
    }

    /// Mark the job as failed with `message`.
    pub fn fail(&mut self, message: impl Into<String>) {
        if self.transition(JobStatus::Failed) {
            self.error = Some(message.into());
        }
    }

    /// Read-only view returned to pollers.
    pub fn snapshot(&self) -> JobSnapshot {
        JobSnapshot {
            job_id: self.id.clone(),
            status: self.status,
            progress: self.progress,
            total: self.total,
            current_file: self.current_file.clone(),
            error: self.error.clone(),
            successful: self.successful,
            skipped: self.skipped,
            failed: self.failed,
            failed_urls: self.failed_urls.clone(),
            created_at: self.created_at,
        }
    }
}

/// Consistent point-in-time view of a job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobSnapshot {
    pub job_id: String,
    pub status: JobStatus,
    pub progress: usize,
    pub total: usize,
    pub current_file: String,
    pub error: Option<String>,
    pub successful: usize,
    pub skipped: usize,
    pub failed: usize,
    pub failed_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
}
