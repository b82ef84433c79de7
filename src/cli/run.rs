//! Command-line mode and the steps shared with the interactive session.

use std::collections::HashSet;
use std::path::Path;

use inquire::Confirm;

use crate::cli::args::Args;
use crate::cli::RunOutcome;
use crate::config::{validate_url, Config, PaginationMode};
use crate::download::{BatchResult, FileDownloader};
use crate::error::Result;
use crate::output::{
    create_spinner, print_batch_header, print_batch_summary, print_error, print_info,
    print_statistics, print_warning, ConsoleObserver,
};
use crate::pagination::{
    listing_template, plan_pages, PageRange, PageRequest, PaginationDetector, RangePolicy,
};
use crate::scrape::{collect, statistics, LinkRecord, LinkScraper};

/// Scrape, confirm and download using only command-line arguments.
pub async fn run_command(args: &Args, config: &Config) -> Result<RunOutcome> {
    let url = args.url.as_deref().unwrap_or_default().trim();
    validate_url(url)?;

    let scraper = LinkScraper::new(&config.scraper)?;
    let detector = PaginationDetector::new(&config.pagination)?;

    let template = listing_template(url);
    let request = PageRequest {
        mode: args.pagination_mode(),
        url,
        url_pattern: Some(&template),
        page_range: args.pages.as_deref(),
    };
    if let Some(range) = request.page_range {
        warn_on_bad_range(range);
    }

    let pages = find_pages(&request, &detector, &scraper).await?;
    let links = scrape(&scraper, &pages, args.extension_filter().as_ref(), args.quiet).await;

    if links.is_empty() {
        print_error("No downloadable files found!");
        return Ok(RunOutcome::NothingFound);
    }

    print_statistics(links.len(), &statistics(&links));

    if !args.yes && !confirm_download(links.len())? {
        print_info("Download cancelled");
        return Ok(RunOutcome::Declined);
    }

    let result = download(config, &links, &config.download.output_directory, args.quiet).await?;
    Ok(RunOutcome::Completed(result))
}

/// Resolve the page URLs for a request, reporting auto-detection results.
pub async fn find_pages(
    request: &PageRequest<'_>,
    detector: &PaginationDetector,
    scraper: &LinkScraper,
) -> Result<Vec<String>> {
    if request.mode == PaginationMode::Auto {
        print_info("Auto-detecting pagination...");
    }

    let pages = plan_pages(request, RangePolicy::Fallback, detector, scraper.client()).await?;

    if request.mode != PaginationMode::Single {
        print_info(&format!("Found {} pages", pages.len()));
    }
    Ok(pages)
}

/// Print a warning when `range` is malformed and will fall back to page 1.
pub fn warn_on_bad_range(range: &str) {
    if let Err(e) = PageRange::parse(range) {
        print_warning(&format!("{}; scraping page 1 only", e));
    }
}

/// Scrape every page behind a spinner and report pages that failed.
pub async fn scrape(
    scraper: &LinkScraper,
    pages: &[String],
    allowed: Option<&HashSet<String>>,
    quiet: bool,
) -> Vec<LinkRecord> {
    let spinner = (!quiet).then(|| create_spinner(&format!("Scraping {} page(s)...", pages.len())));

    let outcome = collect(scraper, pages, allowed).await;

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    for failure in &outcome.failures {
        print_warning(&format!("Skipped {}: {}", failure.url, failure.error));
    }
    outcome.links
}

/// Ask whether to download `count` files.
pub fn confirm_download(count: usize) -> Result<bool> {
    Ok(Confirm::new(&format!("Download {} files?", count))
        .with_default(true)
        .prompt()?)
}

/// Download `links` into `output_dir` with console progress and a summary.
pub async fn download(
    config: &Config,
    links: &[LinkRecord],
    output_dir: &Path,
    quiet: bool,
) -> Result<BatchResult> {
    let downloader = FileDownloader::new(&config.download, &config.scraper.user_agent, output_dir)?;

    print_batch_header(links.len(), downloader.output_dir());
    let mut observer = ConsoleObserver::new(links.len(), quiet);
    let result = downloader.download_batch(links, &mut observer).await;
    observer.finish();

    print_batch_summary(&result, downloader.output_dir());
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_scrape_and_download() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/docs"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<a href="files/a.pdf">A</a><a href="files/b.txt">B</a><a href="index.html">Home</a>"#,
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/files/a.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"a".to_vec()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/files/b.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"b".to_vec()))
            .mount(&server)
            .await;

        let mut config = Config::default();
        config.download.delay_ms = 0;
        let scraper = LinkScraper::new(&config.scraper).unwrap();

        let pages = vec![
            format!("{}/docs", server.uri()),
            format!("{}/missing", server.uri()),
        ];
        let links = scrape(&scraper, &pages, None, true).await;
        assert_eq!(links.len(), 2);

        let dir = tempfile::tempdir().unwrap();
        let result = download(&config, &links, dir.path(), true).await.unwrap();
        assert_eq!(result.successful, 2);
        assert!(dir.path().join("a.pdf").exists());
        assert!(dir.path().join("b.txt").exists());
    }
}
