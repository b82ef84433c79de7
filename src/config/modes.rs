//! Pagination mode definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the set of pages to scrape is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaginationMode {
    /// Scrape only the given page (default).
    #[default]
    Single,
    /// Best-effort detection of pagination links on the first page.
    Auto,
    /// Explicit page range substituted into a `{page}` URL template.
    Manual,
}

impl fmt::Display for PaginationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaginationMode::Single => write!(f, "single"),
            PaginationMode::Auto => write!(f, "auto"),
            PaginationMode::Manual => write!(f, "manual"),
        }
    }
}

impl FromStr for PaginationMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single" => Ok(PaginationMode::Single),
            "auto" => Ok(PaginationMode::Auto),
            "manual" => Ok(PaginationMode::Manual),
            _ => Err(format!("Unknown pagination mode: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        for mode in [
            PaginationMode::Single,
            PaginationMode::Auto,
            PaginationMode::Manual,
        ] {
            assert_eq!(mode.to_string().parse::<PaginationMode>().unwrap(), mode);
        }
        assert_eq!("AUTO".parse::<PaginationMode>().unwrap(), PaginationMode::Auto);
        assert!("pages".parse::<PaginationMode>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let mode: PaginationMode = serde_json::from_str(r#""manual""#).unwrap();
        assert_eq!(mode, PaginationMode::Manual);
    }
}
