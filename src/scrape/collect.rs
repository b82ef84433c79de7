//! Multi-page link collection.
//!
//! Every caller (CLI, web API, stateless function) goes through [`collect`],
//! so a page that fails to load is handled the same way everywhere: it is
//! logged, recorded in [`ScrapeOutcome::failures`] and the run continues.

use std::collections::HashSet;

use serde::Serialize;

use crate::scrape::link::{dedup_links, LinkRecord};
use crate::scrape::page::LinkScraper;

/// A page that could not be scraped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageFailure {
    pub url: String,
    pub error: String,
}

/// Links gathered from a set of pages, plus the pages that failed.
#[derive(Debug, Clone, Default)]
pub struct ScrapeOutcome {
    pub links: Vec<LinkRecord>,
    pub failures: Vec<PageFailure>,
}

/// Scrape every page in order and merge the results.
///
/// Links are deduplicated across pages; the first occurrence wins.
pub async fn collect(
    scraper: &LinkScraper,
    pages: &[String],
    allowed: Option<&HashSet<String>>,
) -> ScrapeOutcome {
    let mut outcome = ScrapeOutcome::default();

    for (i, page) in pages.iter().enumerate() {
        tracing::info!("Scraping page {}/{}: {}", i + 1, pages.len(), page);

        match scraper.scrape_page(page, allowed).await {
            Ok(links) => {
                tracing::info!("  Found {} links", links.len());
                outcome.links.extend(links);
            }
            Err(e) => {
                tracing::warn!("Skipping page {}: {}", page, e);
                outcome.failures.push(PageFailure {
                    url: page.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    outcome.links = dedup_links(outcome.links);
    outcome
}
