//! End-to-end: detect pages, collect links, download, re-run.

use std::time::Duration;

use linkgrab::pagination::{plan_pages, PageRequest, RangePolicy};
use linkgrab::{
    collect, Config, FileDownloader, LinkScraper, NoopObserver, PaginationDetector,
    PaginationMode,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn site() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/docs"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body>
                <a href="/files/guide.pdf">  User
                    guide </a>
                <a href="/files/data.csv?v=2"></a>
                <nav class="pagination">
                    <a href="/docs/page/2">2</a>
                    <a href="/docs/page/3">3</a>
                    <a href="/about">About</a>
                </nav>
            </body></html>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/docs/page/2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<a href="/files/guide.pdf">Guide again</a><a href="/files/slides.PPTX">Slides</a>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/docs/page/3"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    for (name, body) in [
        ("guide.pdf", "pdf-bytes"),
        ("data.csv", "a,b\n1,2\n"),
        ("slides.PPTX", "pptx-bytes"),
    ] {
        Mock::given(method("GET"))
            .and(path(format!("/files/{}", name)))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;
    }

    server
}

#[tokio::test]
async fn auto_detected_site_is_scraped_and_downloaded() {
    let server = site().await;
    let config = Config::default();
    let scraper = LinkScraper::new(&config.scraper).unwrap();
    let detector = PaginationDetector::new(&config.pagination).unwrap();

    let url = format!("{}/docs", server.uri());
    let request = PageRequest {
        mode: PaginationMode::Auto,
        ..PageRequest::single(&url)
    };
    let pages = plan_pages(&request, RangePolicy::Fallback, &detector, scraper.client())
        .await
        .unwrap();
    assert_eq!(pages.len(), 3);
    assert!(pages.contains(&url));

    let outcome = collect(&scraper, &pages, None).await;
    assert_eq!(outcome.failures.len(), 1);
    assert!(outcome.failures[0].url.ends_with("/docs/page/3"));

    let urls: Vec<_> = outcome.links.iter().map(|l| l.url.as_str()).collect();
    assert_eq!(urls.len(), 3);
    let guide = outcome
        .links
        .iter()
        .find(|l| l.url.ends_with("guide.pdf"))
        .unwrap();
    assert_eq!(guide.text, "User guide");
    let csv = outcome.links.iter().find(|l| l.extension == "csv").unwrap();
    assert_eq!(csv.text, "No description");
    assert!(outcome.links.iter().any(|l| l.extension == "pptx"));

    let dir = tempfile::tempdir().unwrap();
    let downloader = FileDownloader::new(&config.download, "test-agent", dir.path())
        .unwrap()
        .with_delay(Duration::ZERO);

    let first = downloader
        .download_batch(&outcome.links, &mut NoopObserver)
        .await;
    assert_eq!(first.total, 3);
    assert_eq!(first.successful, 3);
    assert_eq!(
        std::fs::read_to_string(dir.path().join("data.csv")).unwrap(),
        "a,b\n1,2\n"
    );

    let second = downloader
        .download_batch(&outcome.links, &mut NoopObserver)
        .await;
    assert_eq!(second.skipped, 3);
    assert_eq!(second.successful + second.failed, 0);
}
