//! Scrape request handling shared by the API and the stateless function.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::config::PaginationMode;
use crate::error::Result;
use crate::pagination::{plan_pages, PageRequest, PaginationDetector, RangePolicy};
use crate::scrape::{
    collect, normalize_extension_filter, statistics, LinkRecord, LinkScraper, PageFailure,
    ScrapeOutcome,
};

/// Body of a scrape request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScrapeRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub pagination_mode: PaginationMode,
    #[serde(default)]
    pub url_pattern: Option<String>,
    #[serde(default)]
    pub page_range: Option<String>,
    #[serde(default)]
    pub extensions: Option<Vec<String>>,
}

impl ScrapeRequest {
    /// The requested URL, if one was given and is not blank.
    pub fn target_url(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }

    /// Normalized extension filter, `None` when no usable filter was sent.
    pub fn extension_filter(&self) -> Option<HashSet<String>> {
        let extensions = self.extensions.as_ref()?;
        let filter = normalize_extension_filter(extensions);
        (!filter.is_empty()).then_some(filter)
    }
}

/// Successful scrape result.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeResponse {
    pub success: bool,
    pub links: Vec<LinkRecord>,
    pub count: usize,
    pub statistics: BTreeMap<String, usize>,
    pub failed_pages: Vec<PageFailure>,
}

impl From<ScrapeOutcome> for ScrapeResponse {
    fn from(outcome: ScrapeOutcome) -> Self {
        Self {
            success: true,
            count: outcome.links.len(),
            statistics: statistics(&outcome.links),
            links: outcome.links,
            failed_pages: outcome.failures,
        }
    }
}

/// Run a scrape for `url`.
///
/// In single mode a failing fetch is returned as an error; in the other
/// modes failing pages are listed in `failed_pages` instead.
pub async fn run_scrape(
    request: &ScrapeRequest,
    url: &str,
    scraper: &LinkScraper,
    detector: &PaginationDetector,
    policy: RangePolicy,
) -> Result<ScrapeResponse> {
    let allowed = request.extension_filter();

    let outcome = match request.pagination_mode {
        PaginationMode::Single => ScrapeOutcome {
            links: scraper.scrape_page(url, allowed.as_ref()).await?,
            failures: Vec::new(),
        },
        mode => {
            let page_request = PageRequest {
                mode,
                url,
                url_pattern: request.url_pattern.as_deref(),
                page_range: request.page_range.as_deref(),
            };
            let pages = plan_pages(&page_request, policy, detector, scraper.client()).await?;
            collect(scraper, &pages, allowed.as_ref()).await
        }
    };

    tracing::info!(
        "Scrape of {} found {} links ({} pages failed)",
        url,
        outcome.links.len(),
        outcome.failures.len()
    );
    Ok(outcome.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request: ScrapeRequest = serde_json::from_str(r#"{"url": "https://a.com"}"#).unwrap();
        assert_eq!(request.pagination_mode, PaginationMode::Single);
        assert_eq!(request.target_url(), Some("https://a.com"));
        assert!(request.extension_filter().is_none());
    }

    #[test]
    fn test_blank_url_is_missing() {
        let request: ScrapeRequest = serde_json::from_str(r#"{"url": "   "}"#).unwrap();
        assert_eq!(request.target_url(), None);
    }

    #[test]
    fn test_extension_filter_normalized() {
        let request: ScrapeRequest =
            serde_json::from_str(r#"{"url": "x", "extensions": [".PDF", " zip ", ""]}"#).unwrap();
        let filter = request.extension_filter().unwrap();
        assert_eq!(filter.len(), 2);
        assert!(filter.contains("pdf"));
        assert!(filter.contains("zip"));
    }

    #[test]
    fn test_response_from_outcome() {
        let outcome = ScrapeOutcome {
            links: vec![
                LinkRecord::new("http://a/1.pdf".into(), "", "pdf".into(), 100),
                LinkRecord::new("http://a/2.pdf".into(), "", "pdf".into(), 100),
            ],
            failures: vec![PageFailure {
                url: "http://a/page/2".into(),
                error: "HTTP 404".into(),
            }],
        };
        let response = ScrapeResponse::from(outcome);
        assert!(response.success);
        assert_eq!(response.count, 2);
        assert_eq!(response.statistics.get("pdf"), Some(&2));
        assert_eq!(response.failed_pages.len(), 1);
    }
}
