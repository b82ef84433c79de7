//! Link scraping module.
//!
//! This module provides:
//! - File extension classification
//! - Link records and per-extension statistics
//! - Single-page scraping
//! - Multi-page collection with per-page failure tracking

pub mod collect;
pub mod extension;
pub mod link;
pub mod page;

pub use collect::{collect, PageFailure, ScrapeOutcome};
pub use extension::{extension_of, is_downloadable, normalize_extension_filter};
pub use link::{dedup_links, filter_by_extensions, statistics, LinkRecord};
pub use page::{extract_links, LinkScraper};
