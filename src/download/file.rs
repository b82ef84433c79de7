//! Single file downloading.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::StreamExt;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::client::HttpClient;
use crate::config::DownloadConfig;
use crate::error::{Error, Result};
use crate::fs::{ensure_dir, output_filename};

/// Result of a single download attempt that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// The file was fetched and written.
    Downloaded(PathBuf),
    /// A file already existed at the target path; nothing was fetched.
    Skipped(PathBuf),
}

/// Downloads files into a single output directory.
#[derive(Debug, Clone)]
pub struct FileDownloader {
    client: HttpClient,
    output_dir: PathBuf,
    chunk_size: usize,
    pub(crate) delay: Duration,
}

impl FileDownloader {
    /// Create a downloader writing into `output_dir`, creating it if needed.
    pub fn new(
        config: &DownloadConfig,
        user_agent: &str,
        output_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        let client = HttpClient::new(user_agent, config.timeout())?;
        let output_dir = output_dir.into();
        ensure_dir(&output_dir)?;

        Ok(Self {
            client,
            output_dir,
            chunk_size: config.chunk_size.max(1),
            delay: config.delay(),
        })
    }

    /// Override the delay between consecutive downloads.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path a given URL is saved to.
    pub fn output_path(&self, url: &str) -> PathBuf {
        let now = chrono::Utc::now().timestamp();
        self.output_dir.join(output_filename(url, now))
    }

    /// Download one file.
    ///
    /// An existing file at the target path is left untouched and reported as
    /// [`FileOutcome::Skipped`]; it is not checked for completeness. On any
    /// error the partially written file is removed.
    pub async fn download_file(&self, url: &str) -> Result<FileOutcome> {
        let output_path = self.output_path(url);

        if output_path.exists() {
            tracing::debug!("Skipping existing file: {}", output_path.display());
            return Ok(FileOutcome::Skipped(output_path));
        }

        match self.fetch_to(url, &output_path).await {
            Ok(bytes) => {
                tracing::debug!("Downloaded {} ({} bytes)", output_path.display(), bytes);
                Ok(FileOutcome::Downloaded(output_path))
            }
            Err(e) => {
                if output_path.exists() {
                    if let Err(remove_err) = tokio::fs::remove_file(&output_path).await {
                        tracing::warn!(
                            "Failed to remove partial file {}: {}",
                            output_path.display(),
                            remove_err
                        );
                    }
                }
                Err(e)
            }
        }
    }

    /// Stream the response body for `url` into `output_path`.
    async fn fetch_to(&self, url: &str, output_path: &Path) -> Result<u64> {
        let response = self.client.get(url).await?;

        let file = File::create(output_path)
            .await
            .map_err(|e| Error::filesystem(output_path, e))?;
        let mut writer = BufWriter::with_capacity(self.chunk_size, file);
        let mut stream = response.bytes_stream();
        let mut downloaded: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Error::fetch(url, format!("Stream error: {}", e)))?;
            writer
                .write_all(&chunk)
                .await
                .map_err(|e| Error::filesystem(output_path, e))?;
            downloaded += chunk.len() as u64;
        }

        writer
            .flush()
            .await
            .map_err(|e| Error::filesystem(output_path, e))?;

        Ok(downloaded)
    }
}
