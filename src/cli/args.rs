//! Command-line argument definitions using clap.

use std::collections::HashSet;
use std::path::PathBuf;

use clap::Parser;

use crate::config::{Config, PaginationMode};
use crate::scrape::normalize_extension_filter;

/// Scrape a web page for downloadable files and download them.
#[derive(Parser, Debug)]
#[command(
    name = "linkgrab",
    version,
    about = "Find and download files linked from web pages",
    long_about = "Scrape one or more web pages for links to downloadable files \
                  (documents, archives, images, media) and download them.\n\n\
                  Run without --url for an interactive session.\n\n\
                  Examples:\n  \
                  linkgrab --url https://example.com/documents\n  \
                  linkgrab --url 'https://example.com/docs/page/{page}' --pages 1-10 -e pdf\n  \
                  linkgrab --url https://example.com/docs -e pdf,doc -o my-docs"
)]
pub struct Args {
    /// URL to scrape. A `{page}` placeholder marks where page numbers go.
    #[arg(short, long)]
    pub url: Option<String>,

    /// Page range to scrape, e.g. "1-10" or "1,2,3,5".
    #[arg(short, long, conflicts_with = "auto")]
    pub pages: Option<String>,

    /// Detect pagination links on the first page and scrape every page found.
    #[arg(long)]
    pub auto: bool,

    /// Comma-separated file extensions to download, e.g. "pdf,doc,zip".
    #[arg(short, long, value_delimiter = ',')]
    pub extensions: Option<Vec<String>>,

    /// Output directory for downloaded files.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Skip the confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,

    /// Path to configuration file.
    #[arg(short, long, default_value = "linkgrab.toml")]
    pub config: PathBuf,

    /// Delay between downloads in milliseconds.
    #[arg(long)]
    pub delay: Option<u64>,

    /// Browser user agent string.
    #[arg(long = "user-agent", env = "LINKGRAB_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Hide per-file progress output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    /// How the pages to scrape are chosen.
    pub fn pagination_mode(&self) -> PaginationMode {
        if self.pages.is_some() {
            PaginationMode::Manual
        } else if self.auto {
            PaginationMode::Auto
        } else {
            PaginationMode::Single
        }
    }

    /// Normalized extension filter, if one was given.
    pub fn extension_filter(&self) -> Option<HashSet<String>> {
        let filter = normalize_extension_filter(self.extensions.as_deref().unwrap_or_default());
        (!filter.is_empty()).then_some(filter)
    }

    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(dir) = &self.output {
            config.download.output_directory = dir.clone();
        }

        if let Some(delay) = self.delay {
            config.download.delay_ms = delay;
        }

        if let Some(user_agent) = &self.user_agent {
            config.scraper.user_agent = user_agent.clone();
        }
    }
}
