//! Configuration validation logic.

use crate::config::loader::Config;
use crate::error::{Error, Result};
use regex::Regex;
use scraper::Selector;
use url::Url;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_positive("scraper.timeout_seconds", config.scraper.timeout_seconds)?;
    validate_positive("download.timeout_seconds", config.download.timeout_seconds)?;
    validate_positive("download.chunk_size", config.download.chunk_size as u64)?;
    validate_positive(
        "server.max_concurrent_jobs",
        config.server.max_concurrent_jobs as u64,
    )?;
    validate_positive(
        "server.function_page_cap",
        config.server.function_page_cap as u64,
    )?;
    validate_positive(
        "server.proxy_timeout_seconds",
        config.server.proxy_timeout_seconds,
    )?;
    validate_positive("server.proxy_max_bytes", config.server.proxy_max_bytes)?;

    if config.scraper.user_agent.trim().is_empty() {
        return Err(Error::ConfigValidation {
            field: "scraper.user_agent".to_string(),
            message: "User agent cannot be empty".to_string(),
        });
    }

    validate_pagination(&config.pagination.selectors, &config.pagination.page_pattern)?;

    Ok(())
}

fn validate_positive(field: &str, value: u64) -> Result<()> {
    if value == 0 {
        return Err(Error::ConfigValidation {
            field: field.to_string(),
            message: "Value must be greater than zero".to_string(),
        });
    }
    Ok(())
}

/// Validate the pagination selectors and page pattern.
pub fn validate_pagination(selectors: &[String], page_pattern: &str) -> Result<()> {
    for selector in selectors {
        if Selector::parse(selector).is_err() {
            return Err(Error::ConfigValidation {
                field: "pagination.selectors".to_string(),
                message: format!("Invalid CSS selector: '{}'", selector),
            });
        }
    }

    if let Err(e) = Regex::new(page_pattern) {
        return Err(Error::ConfigValidation {
            field: "pagination.page_pattern".to_string(),
            message: format!("Invalid regex: {}", e),
        });
    }

    Ok(())
}

/// Validate a target URL supplied by the user.
///
/// Only absolute `http`/`https` URLs are accepted. A `{page}` placeholder is
/// allowed and checked with a sample page number substituted.
pub fn validate_url(input: &str) -> Result<Url> {
    let input = input.trim();
    if input.is_empty() {
        return Err(Error::ConfigValidation {
            field: "url".to_string(),
            message: "URL is required".to_string(),
        });
    }

    let url = Url::parse(&input.replace("{page}", "1"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(Error::ConfigValidation {
            field: "url".to_string(),
            message: format!("Unsupported URL scheme '{}'", other),
        }),
    }
}
