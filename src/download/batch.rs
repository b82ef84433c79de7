//! Sequential batch downloading.

use std::path::Path;

use serde::Serialize;
use tokio::time::sleep;

use crate::download::file::{FileDownloader, FileOutcome};
use crate::error::Error;
use crate::scrape::LinkRecord;

/// Counts for one batch run. `successful + skipped + failed == total`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    pub total: usize,
    pub successful: usize,
    pub skipped: usize,
    pub failed: usize,
    pub failed_urls: Vec<String>,
}

/// Per-item outcome reported to a [`BatchObserver`].
#[derive(Debug)]
pub enum ItemOutcome<'a> {
    Downloaded(&'a Path),
    Skipped(&'a Path),
    Failed(&'a Error),
}

/// Receives progress events from [`FileDownloader::download_batch`].
pub trait BatchObserver {
    /// Called before item `index` (zero based) is attempted.
    fn on_start(&mut self, _index: usize, _total: usize, _link: &LinkRecord) {}

    /// Called once item `index` has finished.
    fn on_finish(
        &mut self,
        _index: usize,
        _total: usize,
        _link: &LinkRecord,
        _outcome: &ItemOutcome<'_>,
    ) {
    }
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl BatchObserver for NoopObserver {}

impl FileDownloader {
    /// Download `links` one after another, in the order given.
    ///
    /// Existing files are skipped without a request. Failures are recorded
    /// and the batch continues. The configured delay is slept between
    /// consecutive network downloads, never before the first or after the
    /// last item.
    pub async fn download_batch<O: BatchObserver + ?Sized>(
        &self,
        links: &[LinkRecord],
        observer: &mut O,
    ) -> BatchResult {
        let total = links.len();
        let mut result = BatchResult {
            total,
            ..Default::default()
        };

        tracing::info!(
            "Starting batch download: {} files into {}",
            total,
            self.output_dir().display()
        );

        for (index, link) in links.iter().enumerate() {
            observer.on_start(index, total, link);

            let fetched = match self.download_file(&link.url).await {
                Ok(FileOutcome::Downloaded(path)) => {
                    result.successful += 1;
                    observer.on_finish(index, total, link, &ItemOutcome::Downloaded(&path));
                    true
                }
                Ok(FileOutcome::Skipped(path)) => {
                    result.skipped += 1;
                    observer.on_finish(index, total, link, &ItemOutcome::Skipped(&path));
                    false
                }
                Err(e) => {
                    tracing::warn!("Error downloading {}: {}", link.url, e);
                    result.failed += 1;
                    result.failed_urls.push(link.url.clone());
                    observer.on_finish(index, total, link, &ItemOutcome::Failed(&e));
                    true
                }
            };

            if fetched && index + 1 < total && !self.delay.is_zero() {
                sleep(self.delay).await;
            }
        }

        tracing::info!(
            "Batch complete: {} downloaded, {} skipped, {} failed",
            result.successful,
            result.skipped,
            result.failed
        );

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DownloadConfig;
    use std::time::{Duration, Instant};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn link(server: &MockServer, name: &str) -> LinkRecord {
        LinkRecord::new(
            format!("{}/files/{}", server.uri(), name),
            name,
            crate::scrape::extension_of(name),
            100,
        )
    }

    async fn mount_ok(server: &MockServer, name: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/files/{}", name)))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(name.as_bytes().to_vec()))
            .mount(server)
            .await;
    }

    #[derive(Default)]
    struct Recorder {
        started: Vec<usize>,
        finished: Vec<&'static str>,
    }

    impl BatchObserver for Recorder {
        fn on_start(&mut self, index: usize, _total: usize, _link: &LinkRecord) {
            self.started.push(index);
        }

        fn on_finish(&mut self, _i: usize, _t: usize, _l: &LinkRecord, outcome: &ItemOutcome<'_>) {
            self.finished.push(match outcome {
                ItemOutcome::Downloaded(_) => "downloaded",
                ItemOutcome::Skipped(_) => "skipped",
                ItemOutcome::Failed(_) => "failed",
            });
        }
    }

    #[tokio::test]
    async fn test_mixed_batch_accounting() {
        let server = MockServer::start().await;
        mount_ok(&server, "a.pdf").await;
        mount_ok(&server, "c.txt").await;
        Mock::given(method("GET"))
            .and(path("/files/b.zip"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("d.csv"), b"existing").unwrap();

        let downloader = FileDownloader::new(&DownloadConfig::default(), "test", dir.path())
            .unwrap()
            .with_delay(Duration::ZERO);
        let links: Vec<_> = ["a.pdf", "b.zip", "c.txt", "d.csv"]
            .iter()
            .map(|n| link(&server, n))
            .collect();

        let mut recorder = Recorder::default();
        let result = downloader.download_batch(&links, &mut recorder).await;

        assert_eq!(result.total, 4);
        assert_eq!(result.successful, 2);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.failed, 1);
        assert_eq!(result.successful + result.skipped + result.failed, result.total);
        assert_eq!(result.failed_urls, vec![links[1].url.clone()]);
        assert_eq!(recorder.started, vec![0, 1, 2, 3]);
        assert_eq!(
            recorder.finished,
            vec!["downloaded", "failed", "downloaded", "skipped"]
        );
        assert!(!dir.path().join("b.zip").exists());
    }

    #[tokio::test]
    async fn test_rerun_skips_everything() {
        let server = MockServer::start().await;
        for name in ["one.pdf", "two.pdf", "three.pdf"] {
            mount_ok(&server, name).await;
        }
        let links: Vec<_> = ["one.pdf", "two.pdf", "three.pdf"]
            .iter()
            .map(|n| link(&server, n))
            .collect();

        let dir = tempfile::tempdir().unwrap();
        let downloader = FileDownloader::new(&DownloadConfig::default(), "test", dir.path())
            .unwrap()
            .with_delay(Duration::ZERO);

        let first = downloader.download_batch(&links, &mut NoopObserver).await;
        assert_eq!(first.successful, 3);

        let second = downloader.download_batch(&links, &mut NoopObserver).await;
        assert_eq!(second.successful, 0);
        assert_eq!(second.skipped, 3);
        assert_eq!(second.failed, 0);
    }

    #[tokio::test]
    async fn test_delay_only_between_downloads() {
        let server = MockServer::start().await;
        mount_ok(&server, "x.pdf").await;
        mount_ok(&server, "y.pdf").await;
        let links = vec![link(&server, "x.pdf"), link(&server, "y.pdf")];

        let dir = tempfile::tempdir().unwrap();
        let downloader = FileDownloader::new(&DownloadConfig::default(), "test", dir.path())
            .unwrap()
            .with_delay(Duration::from_millis(200));

        let started = Instant::now();
        downloader.download_batch(&links, &mut NoopObserver).await;
        let elapsed = started.elapsed();

        // One gap between two files, none after the last.
        assert!(elapsed >= Duration::from_millis(200));
        assert!(elapsed < Duration::from_millis(2000));
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let dir = tempfile::tempdir().unwrap();
        let downloader =
            FileDownloader::new(&DownloadConfig::default(), "test", dir.path()).unwrap();
        let result = downloader.download_batch(&[], &mut NoopObserver).await;
        assert_eq!(result, BatchResult::default());
    }
}
