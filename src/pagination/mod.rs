//! Pagination module.
//!
//! Provides:
//! - Page range parsing
//! - `{page}` URL template expansion
//! - Best-effort pagination auto-detection
//! - Resolution of a [`PaginationMode`] into concrete page URLs

pub mod detect;
pub mod range;
pub mod template;

pub use detect::PaginationDetector;
pub use range::{PageRange, RangePolicy};
pub use template::{expand_template, listing_template, PAGE_PLACEHOLDER};

use crate::client::HttpClient;
use crate::config::PaginationMode;
use crate::error::Result;

/// What the caller asked to scrape.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest<'a> {
    pub mode: PaginationMode,
    pub url: &'a str,
    /// Template used in manual mode; defaults to `url`.
    pub url_pattern: Option<&'a str>,
    /// Range expression used in manual mode; defaults to `"1"`.
    pub page_range: Option<&'a str>,
}

impl<'a> PageRequest<'a> {
    pub fn single(url: &'a str) -> Self {
        Self {
            mode: PaginationMode::Single,
            url,
            url_pattern: None,
            page_range: None,
        }
    }
}

/// Resolve a request into the list of page URLs to scrape.
pub async fn plan_pages(
    request: &PageRequest<'_>,
    policy: RangePolicy,
    detector: &PaginationDetector,
    client: &HttpClient,
) -> Result<Vec<String>> {
    match request.mode {
        PaginationMode::Single => Ok(vec![request.url.to_string()]),
        PaginationMode::Auto => Ok(detector.detect(client, request.url).await),
        PaginationMode::Manual => {
            let template = request
                .url_pattern
                .filter(|p| !p.trim().is_empty())
                .unwrap_or(request.url);
            let range = PageRange::parse_with(request.page_range.unwrap_or("1"), policy);
            tracing::debug!("Expanding {} over pages {}", template, range);
            expand_template(template, &range)
        }
    }
}
