//! Extracted link representation.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

/// Label used when an anchor has no visible text.
pub const NO_DESCRIPTION: &str = "No description";

/// A downloadable file reference found on a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// Absolute URL of the file.
    pub url: String,

    /// Visible anchor text, truncated.
    #[serde(default = "default_text")]
    pub text: String,

    /// Lowercase extension without the leading dot.
    #[serde(default)]
    pub extension: String,
}

fn default_text() -> String {
    NO_DESCRIPTION.to_string()
}

impl LinkRecord {
    pub fn new(url: String, text: &str, extension: String, text_limit: usize) -> Self {
        Self {
            url,
            text: normalize_text(text, text_limit),
            extension,
        }
    }
}

/// Collapse whitespace, truncate to `limit` characters and fall back to
/// [`NO_DESCRIPTION`] when nothing is left.
pub fn normalize_text(text: &str, limit: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return NO_DESCRIPTION.to_string();
    }
    truncate_chars(&collapsed, limit)
}

/// Truncate a string to at most `limit` characters (not bytes).
pub fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

/// Remove duplicate URLs, keeping the first occurrence and the input order.
pub fn dedup_links(links: Vec<LinkRecord>) -> Vec<LinkRecord> {
    let mut seen = HashSet::new();
    links
        .into_iter()
        .filter(|link| seen.insert(link.url.clone()))
        .collect()
}

/// Keep only links whose extension is in `extensions`. An empty filter keeps
/// everything.
pub fn filter_by_extensions(links: Vec<LinkRecord>, extensions: &HashSet<String>) -> Vec<LinkRecord> {
    if extensions.is_empty() {
        return links;
    }
    links
        .into_iter()
        .filter(|link| extensions.contains(&link.extension))
        .collect()
}

/// Count links per extension.
pub fn statistics(links: &[LinkRecord]) -> BTreeMap<String, usize> {
    let mut stats = BTreeMap::new();
    for link in links {
        *stats.entry(link.extension.clone()).or_insert(0) += 1;
    }
    stats
}
