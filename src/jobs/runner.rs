//! Background execution of download jobs.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use crate::config::{Config, DownloadConfig};
use crate::download::{BatchObserver, BatchResult, FileDownloader, ItemOutcome};
use crate::error::Result;
use crate::jobs::job::JobStatus;
use crate::jobs::registry::JobRegistry;
use crate::scrape::LinkRecord;

/// A job that has been accepted and scheduled.
#[derive(Debug)]
pub struct SubmittedJob {
    pub id: String,
    /// Resolves once the job reached a terminal state.
    pub handle: JoinHandle<()>,
}

/// Starts download jobs on the tokio runtime.
///
/// At most `max_concurrent_jobs` jobs download at the same time; further
/// jobs stay `pending` until a slot frees up. There is no cancellation.
#[derive(Debug, Clone)]
pub struct JobRunner {
    registry: JobRegistry,
    permits: Arc<Semaphore>,
    download: DownloadConfig,
    user_agent: String,
    jobs_root: PathBuf,
    delay: Duration,
}

impl JobRunner {
    pub fn new(config: &Config, registry: JobRegistry) -> Self {
        Self {
            registry,
            permits: Arc::new(Semaphore::new(config.server.max_concurrent_jobs.max(1))),
            download: config.download.clone(),
            user_agent: config.scraper.user_agent.clone(),
            jobs_root: config.server.jobs_directory.clone(),
            delay: Duration::from_millis(config.server.job_delay_ms),
        }
    }

    pub fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    /// Create a job for `links` and schedule it.
    pub fn submit(&self, links: Vec<LinkRecord>) -> SubmittedJob {
        let id = self.registry.create(links, &self.jobs_root);
        let runner = self.clone();
        let job_id = id.clone();

        let handle = tokio::spawn(async move {
            runner.supervise(job_id).await;
        });

        SubmittedJob { id, handle }
    }

    /// Run the job in its own task so that a panic is reported as a failed
    /// job instead of being lost.
    async fn supervise(self, id: String) {
        let permit = match self.permits.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(e) => {
                self.finish_failed(&id, format!("Job scheduler closed: {}", e));
                return;
            }
        };

        let worker = {
            let runner = self.clone();
            let id = id.clone();
            tokio::spawn(async move { runner.execute(&id).await })
        };

        let outcome = worker.await;
        drop(permit);

        match outcome {
            Ok(Ok(result)) => {
                let _ = self.registry.update(&id, |job| {
                    job.progress = job.total;
                    job.successful = result.successful;
                    job.skipped = result.skipped;
                    job.failed = result.failed;
                    job.failed_urls = result.failed_urls;
                    job.current_file.clear();
                    job.transition(JobStatus::Completed);
                });
                tracing::info!("Job {} completed", id);
            }
            Ok(Err(e)) => self.finish_failed(&id, e.to_string()),
            Err(join_error) => {
                self.finish_failed(&id, format!("Worker crashed: {}", join_error))
            }
        }
    }

    async fn execute(&self, id: &str) -> Result<BatchResult> {
        let job = self.registry.get(id)?;
        self.registry
            .update(id, |job| job.transition(JobStatus::Downloading))?;

        let downloader = FileDownloader::new(&self.download, &self.user_agent, &job.output_dir)?
            .with_delay(self.delay);

        let mut observer = JobObserver {
            registry: &self.registry,
            id,
        };
        Ok(downloader.download_batch(&job.links, &mut observer).await)
    }

    fn finish_failed(&self, id: &str, message: String) {
        tracing::error!("Job {} failed: {}", id, message);
        if let Err(e) = self.registry.update(id, |job| job.fail(message)) {
            tracing::error!("Could not record failure for job {}: {}", id, e);
        }
    }
}

/// Mirrors batch progress into the job record.
struct JobObserver<'a> {
    registry: &'a JobRegistry,
    id: &'a str,
}

impl BatchObserver for JobObserver<'_> {
    fn on_start(&mut self, index: usize, _total: usize, link: &LinkRecord) {
        let _ = self
            .registry
            .update(self.id, |job| job.begin_item(index, &link.text));
    }

    fn on_finish(
        &mut self,
        _index: usize,
        _total: usize,
        link: &LinkRecord,
        outcome: &ItemOutcome<'_>,
    ) {
        let _ = self.registry.update(self.id, |job| match outcome {
            ItemOutcome::Downloaded(_) => job.successful += 1,
            ItemOutcome::Skipped(_) => job.skipped += 1,
            ItemOutcome::Failed(_) => {
                job.failed += 1;
                job.failed_urls.push(link.url.clone());
            }
        });
    }
}
