//! Page range expressions such as `"1-3,5,8-10"`.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::{Error, Result};

/// Upper bound on the number of pages a single expression may expand to.
const MAX_PAGES: usize = 10_000;

/// A sorted, duplicate-free set of page numbers (all ≥ 1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRange(Vec<u32>);

/// How malformed or oversized expressions are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangePolicy {
    /// Malformed input falls back to page 1.
    Fallback,
    /// As `Fallback`, and each `start-end` token and the whole result are
    /// limited to the given number of pages.
    Capped(usize),
}

impl PageRange {
    /// Parse an expression strictly.
    ///
    /// Tokens are comma separated; each is a page number or an inclusive
    /// `start-end` span. Whitespace around tokens and numbers is ignored.
    pub fn parse(expr: &str) -> Result<Self> {
        Self::parse_inner(expr, None)
    }

    /// Parse an expression, falling back to `[1]` on malformed input.
    pub fn parse_or_default(expr: &str) -> Self {
        Self::parse_with(expr, RangePolicy::Fallback)
    }

    /// Parse with a per-token and total cap, falling back to `[1]`.
    pub fn parse_capped(expr: &str, cap: usize) -> Self {
        Self::parse_with(expr, RangePolicy::Capped(cap))
    }

    /// Parse according to `policy`.
    pub fn parse_with(expr: &str, policy: RangePolicy) -> Self {
        let cap = match policy {
            RangePolicy::Fallback => None,
            RangePolicy::Capped(cap) => Some(cap.max(1)),
        };
        Self::parse_inner(expr, cap).unwrap_or_else(|e| {
            tracing::debug!("Invalid page range '{}' ({}), using page 1", expr, e);
            Self::first_page()
        })
    }

    /// The single-page range `[1]`.
    pub fn first_page() -> Self {
        Self(vec![1])
    }

    fn parse_inner(expr: &str, cap: Option<usize>) -> Result<Self> {
        let mut pages = BTreeSet::new();

        for token in expr.split(',') {
            let token = token.trim();
            if token.is_empty() {
                return Err(Error::Parse(format!("Empty token in page range '{}'", expr)));
            }

            match token.split_once('-') {
                Some((start, end)) => {
                    let start = parse_page(start)?;
                    let end = parse_page(end)?;
                    if start > end {
                        return Err(Error::Parse(format!(
                            "Range start exceeds end in '{}'",
                            token
                        )));
                    }
                    let end = match cap {
                        Some(cap) => end.min(start.saturating_add(cap as u32 - 1)),
                        None => end,
                    };
                    if (end - start) as usize + pages.len() >= MAX_PAGES {
                        return Err(Error::Parse(format!(
                            "Page range '{}' expands to more than {} pages",
                            expr, MAX_PAGES
                        )));
                    }
                    pages.extend(start..=end);
                }
                None => {
                    pages.insert(parse_page(token)?);
                }
            }
        }

        let mut pages: Vec<u32> = pages.into_iter().collect();
        if let Some(cap) = cap {
            pages.truncate(cap);
        }
        Ok(Self(pages))
    }

    pub fn pages(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }
}

fn parse_page(input: &str) -> Result<u32> {
    let input = input.trim();
    let page: u32 = input
        .parse()
        .map_err(|_| Error::Parse(format!("Invalid page number '{}'", input)))?;
    if page == 0 {
        return Err(Error::Parse("Page numbers start at 1".to_string()));
    }
    Ok(page)
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(u32::to_string).collect();
        write!(f, "{}", parts.join(","))
    }
}
