//! linkgrab - find and download files linked from web pages
//!
//! This library scrapes web pages for links to downloadable files and
//! downloads them, either directly from the CLI or as background jobs behind
//! a small HTTP API.
//!
//! # Features
//!
//! - Link extraction with extension filtering and deduplication
//! - Pagination by page range, `{page}` templates or best-effort detection
//! - Sequential, rate-limited downloads that skip existing files
//! - Background download jobs with progress polling and ZIP export
//! - A stateless scrape function and download proxy with CORS headers
//!
//! # Example
//!
//! ```no_run
//! use linkgrab::{collect, Config, FileDownloader, LinkScraper, NoopObserver};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let scraper = LinkScraper::new(&config.scraper)?;
//!
//!     let pages = vec!["https://example.com/documents".to_string()];
//!     let outcome = collect(&scraper, &pages, None).await;
//!
//!     let downloader = FileDownloader::new(&config.download, &config.scraper.user_agent, "downloads")?;
//!     let result = downloader.download_batch(&outcome.links, &mut NoopObserver).await;
//!     println!("{} downloaded, {} failed", result.successful, result.failed);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod download;
pub mod error;
pub mod fs;
pub mod jobs;
pub mod output;
pub mod pagination;
pub mod scrape;
pub mod web;

// Re-exports for convenience
pub use config::{Config, PaginationMode};
pub use download::{BatchObserver, BatchResult, FileDownloader, FileOutcome, NoopObserver};
pub use error::{Error, Result};
pub use jobs::{JobRegistry, JobRunner, JobSnapshot, JobStatus};
pub use pagination::{PageRange, PaginationDetector};
pub use scrape::{collect, LinkRecord, LinkScraper, ScrapeOutcome};
