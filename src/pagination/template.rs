//! `{page}` URL templates.

use crate::error::{Error, Result};
use crate::pagination::range::PageRange;

/// Placeholder substituted with each page number.
pub const PAGE_PLACEHOLDER: &str = "{page}";

/// Produce one URL per page, in ascending page order.
pub fn expand_template(template: &str, range: &PageRange) -> Result<Vec<String>> {
    if !template.contains(PAGE_PLACEHOLDER) {
        return Err(Error::Parse(format!(
            "URL pattern '{}' has no {} placeholder",
            template, PAGE_PLACEHOLDER
        )));
    }

    Ok(range
        .iter()
        .map(|page| template.replace(PAGE_PLACEHOLDER, &page.to_string()))
        .collect())
}

/// Turn a plain listing URL into a template by appending `/page/{page}`.
///
/// URLs that already contain the placeholder are returned unchanged.
pub fn listing_template(url: &str) -> String {
    if url.contains(PAGE_PLACEHOLDER) {
        url.to_string()
    } else {
        format!("{}/page/{}", url.trim_end_matches('/'), PAGE_PLACEHOLDER)
    }
}
