//! Configuration structures and loading logic.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scraper: ScraperConfig,

    #[serde(default)]
    pub download: DownloadConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub pagination: PaginationConfig,
}

/// Page fetching configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Request timeout for page fetches, in seconds.
    #[serde(default = "default_scrape_timeout")]
    pub timeout_seconds: u64,

    /// Browser user agent string sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum number of characters kept from a link's visible text.
    #[serde(default = "default_text_limit")]
    pub text_limit: usize,
}

/// File download configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Directory downloaded files are written to.
    #[serde(default = "default_output_dir")]
    pub output_directory: PathBuf,

    /// Request timeout for file downloads, in seconds.
    #[serde(default = "default_download_timeout")]
    pub timeout_seconds: u64,

    /// Write buffer size used while streaming a response to disk.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Fixed delay between consecutive downloads, in milliseconds.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

/// Web server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the web API listens on.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Root directory for per-job output folders.
    #[serde(default = "default_output_dir")]
    pub jobs_directory: PathBuf,

    /// Delay between downloads inside a job, in milliseconds.
    #[serde(default = "default_job_delay_ms")]
    pub job_delay_ms: u64,

    /// Maximum number of download jobs running at the same time.
    #[serde(default = "default_max_jobs")]
    pub max_concurrent_jobs: usize,

    /// Page cap applied by the stateless scrape function.
    #[serde(default = "default_function_page_cap")]
    pub function_page_cap: usize,

    /// Page fetch timeout for the stateless scrape function, in seconds.
    #[serde(default = "default_function_timeout")]
    pub function_timeout_seconds: u64,

    /// Request timeout for the download proxy, in seconds.
    #[serde(default = "default_function_timeout")]
    pub proxy_timeout_seconds: u64,

    /// Largest file the download proxy will relay, in bytes.
    #[serde(default = "default_proxy_max_bytes")]
    pub proxy_max_bytes: u64,
}

/// Pagination auto-detection configuration.
///
/// Detection is best effort: the selectors are tried in order against the
/// first page and every candidate whose URL matches `page_pattern` is kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    #[serde(default = "default_selectors")]
    pub selectors: Vec<String>,

    #[serde(default = "default_page_pattern")]
    pub page_pattern: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_scrape_timeout(),
            user_agent: default_user_agent(),
            text_limit: default_text_limit(),
        }
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            output_directory: default_output_dir(),
            timeout_seconds: default_download_timeout(),
            chunk_size: default_chunk_size(),
            delay_ms: default_delay_ms(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            jobs_directory: default_output_dir(),
            job_delay_ms: default_job_delay_ms(),
            max_concurrent_jobs: default_max_jobs(),
            function_page_cap: default_function_page_cap(),
            function_timeout_seconds: default_function_timeout(),
            proxy_timeout_seconds: default_function_timeout(),
            proxy_max_bytes: default_proxy_max_bytes(),
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            selectors: default_selectors(),
            page_pattern: default_page_pattern(),
        }
    }
}

fn default_scrape_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string()
}

fn default_text_limit() -> usize {
    100
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_download_timeout() -> u64 {
    60
}

fn default_chunk_size() -> usize {
    8192
}

fn default_delay_ms() -> u64 {
    500
}

fn default_bind() -> String {
    "127.0.0.1:5000".to_string()
}

fn default_job_delay_ms() -> u64 {
    300
}

fn default_max_jobs() -> usize {
    4
}

fn default_function_page_cap() -> usize {
    10
}

fn default_function_timeout() -> u64 {
    8
}

fn default_proxy_max_bytes() -> u64 {
    10 * 1024 * 1024
}

fn default_selectors() -> Vec<String> {
    [
        ".pagination a",
        ".pager a",
        "nav a",
        r#"a[rel="next"]"#,
        r#"a[rel="prev"]"#,
        "a.page-link",
        "a.page-numbers",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_page_pattern() -> String {
    r"/page/\d+|[?&]page=\d+|\d+/?$".to_string()
}

impl ScraperConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl DownloadConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration if the file exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(
                "No configuration file at {}, using defaults",
                path.display()
            );
            Ok(Self::default())
        }
    }
}
