//! Interactive session.

use std::fmt;
use std::path::PathBuf;

use inquire::validator::Validation;
use inquire::{Confirm, CustomUserError, Select, Text};

use crate::cli::run::{confirm_download, download, find_pages, scrape, warn_on_bad_range};
use crate::cli::RunOutcome;
use crate::config::{validate_url, Config, PaginationMode};
use crate::error::Result as CrateResult;
use crate::output::{print_error, print_info, print_preview, print_statistics};
use crate::pagination::{listing_template, PageRequest, PaginationDetector, PAGE_PLACEHOLDER};
use crate::scrape::{filter_by_extensions, normalize_extension_filter, statistics, LinkScraper};

#[derive(Debug, Clone, Copy)]
struct PaginationChoice(PaginationMode);

impl fmt::Display for PaginationChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            PaginationMode::Single => write!(f, "Single page only"),
            PaginationMode::Auto => write!(f, "Auto-detect pagination"),
            PaginationMode::Manual => write!(f, "Manual pagination (e.g. pages 1-10)"),
        }
    }
}

/// Walk the user through scraping and downloading.
///
/// Cancelling any prompt surfaces as an [`crate::Error::Prompt`] for which
/// `is_cancelled()` holds.
pub async fn run_interactive(config: &Config, quiet: bool) -> CrateResult<RunOutcome> {
    let url = Text::new("Enter the webpage URL to scrape:")
        .with_validator(|input: &str| -> Result<Validation, CustomUserError> {
            Ok(match validate_url(input) {
                Ok(_) => Validation::Valid,
                Err(e) => Validation::Invalid(e.to_string().into()),
            })
        })
        .prompt()?;
    let url = url.trim();

    let choices = vec![
        PaginationChoice(PaginationMode::Single),
        PaginationChoice(PaginationMode::Auto),
        PaginationChoice(PaginationMode::Manual),
    ];
    let mode = Select::new("Pagination:", choices)
        .with_starting_cursor(0)
        .prompt()?
        .0;

    let (pattern, range) = if mode == PaginationMode::Manual {
        let pattern = Text::new("URL pattern with {page} placeholder:")
            .with_default(&listing_template(url))
            .with_validator(|input: &str| -> Result<Validation, CustomUserError> {
                Ok(if input.contains(PAGE_PLACEHOLDER) {
                    Validation::Valid
                } else {
                    Validation::Invalid("The pattern must contain {page}".into())
                })
            })
            .prompt()?;
        let range = Text::new("Page range (e.g. 1-10 or 1,2,3,5):")
            .with_default("1")
            .prompt()?;
        warn_on_bad_range(&range);
        (Some(pattern), Some(range))
    } else {
        (None, None)
    };

    let scraper = LinkScraper::new(&config.scraper)?;
    let detector = PaginationDetector::new(&config.pagination)?;
    let request = PageRequest {
        mode,
        url,
        url_pattern: pattern.as_deref(),
        page_range: range.as_deref(),
    };

    let pages = find_pages(&request, &detector, &scraper).await?;
    let mut links = scrape(&scraper, &pages, None, quiet).await;

    if links.is_empty() {
        print_error("No downloadable files found!");
        return Ok(RunOutcome::NothingFound);
    }

    print_statistics(links.len(), &statistics(&links));

    if Confirm::new("Filter by file type?")
        .with_default(false)
        .prompt()?
    {
        let input = Text::new("Extensions to download (comma-separated, e.g. pdf,doc,zip):")
            .with_default("")
            .prompt()?;
        let filter = normalize_extension_filter(input.split(','));
        if !filter.is_empty() {
            links = filter_by_extensions(links, &filter);
            print_info(&format!("Filtered to {} files", links.len()));
        }
        if links.is_empty() {
            print_error("No files match the filter!");
            return Ok(RunOutcome::NothingFound);
        }
    }

    print_preview(&links);

    if !confirm_download(links.len())? {
        print_info("Download cancelled");
        return Ok(RunOutcome::Declined);
    }

    let default_dir = config.download.output_directory.display().to_string();
    let output_dir = Text::new("Output directory:")
        .with_default(&default_dir)
        .prompt()?;
    let output_dir = match output_dir.trim() {
        "" => config.download.output_directory.clone(),
        dir => PathBuf::from(dir),
    };

    let result = download(config, &links, &output_dir, quiet).await?;
    Ok(RunOutcome::Completed(result))
}
