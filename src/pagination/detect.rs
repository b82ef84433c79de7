//! Best-effort pagination auto-detection.
//!
//! The first page is scanned with the configured selectors (common
//! pagination UI conventions) and every candidate link whose path or query
//! looks like a page reference is kept. This can miss pages or pick up
//! unrelated numbered links; it is not an exhaustive page enumerator.

use std::collections::BTreeSet;

use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

use crate::client::HttpClient;
use crate::config::validation::validate_pagination;
use crate::config::PaginationConfig;
use crate::error::{Error, Result};

/// Compiled pagination selectors and page-reference pattern.
#[derive(Debug, Clone)]
pub struct PaginationDetector {
    selectors: Vec<Selector>,
    page_pattern: Regex,
}

impl PaginationDetector {
    /// Compile the detector from configuration.
    pub fn new(config: &PaginationConfig) -> Result<Self> {
        validate_pagination(&config.selectors, &config.page_pattern)?;

        let selectors = config
            .selectors
            .iter()
            .filter_map(|s| Selector::parse(s).ok())
            .collect();
        let page_pattern = Regex::new(&config.page_pattern)
            .map_err(|e| Error::Config(format!("Invalid page pattern: {}", e)))?;

        Ok(Self {
            selectors,
            page_pattern,
        })
    }

    /// Fetch `url` and return the sorted set of page URLs found on it.
    ///
    /// If the page cannot be fetched, only `url` itself is returned.
    pub async fn detect(&self, client: &HttpClient, url: &str) -> Vec<String> {
        let base = match Url::parse(url) {
            Ok(base) => base,
            Err(e) => {
                tracing::warn!("Cannot detect pagination for {}: {}", url, e);
                return vec![url.to_string()];
            }
        };

        match client.fetch_text(url).await {
            Ok(html) => {
                let pages = self.detect_in_html(&html, &base);
                tracing::info!("Detected {} page(s) from {}", pages.len(), url);
                pages
            }
            Err(e) => {
                tracing::warn!("Error detecting pagination: {}", e);
                vec![url.to_string()]
            }
        }
    }

    /// Scan an already fetched document. The result always contains `base`.
    pub fn detect_in_html(&self, html: &str, base: &Url) -> Vec<String> {
        let document = Html::parse_document(html);
        let mut pages = BTreeSet::new();
        pages.insert(base.to_string());

        for selector in &self.selectors {
            for element in document.select(selector) {
                let Some(href) = element.value().attr("href") else {
                    continue;
                };
                let href = href.trim();
                if href.is_empty() {
                    continue;
                }
                let Ok(candidate) = base.join(href) else {
                    continue;
                };
                if self.looks_like_page(&candidate) {
                    pages.insert(candidate.to_string());
                }
            }
        }

        pages.into_iter().collect()
    }

    fn looks_like_page(&self, url: &Url) -> bool {
        let target = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };
        self.page_pattern.is_match(&target)
    }
}
