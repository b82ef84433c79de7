//! Single-page link scraping.

use std::collections::HashSet;
use std::sync::LazyLock;

use scraper::{Html, Selector};
use url::Url;

use crate::client::HttpClient;
use crate::config::ScraperConfig;
use crate::error::Result;
use crate::scrape::extension::{extension_of, is_downloadable};
use crate::scrape::link::LinkRecord;

static ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// Fetches pages and extracts downloadable links from them.
#[derive(Debug, Clone)]
pub struct LinkScraper {
    client: HttpClient,
    text_limit: usize,
}

impl LinkScraper {
    /// Create a scraper from configuration.
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let client = HttpClient::new(&config.user_agent, config.timeout())?;
        Ok(Self::with_client(client, config.text_limit))
    }

    /// Create a scraper around an existing client.
    pub fn with_client(client: HttpClient, text_limit: usize) -> Self {
        Self { client, text_limit }
    }

    /// The underlying HTTP client.
    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Fetch `url` and return the downloadable links it contains.
    ///
    /// `allowed`, when given and non-empty, further restricts the accepted
    /// extensions.
    pub async fn scrape_page(
        &self,
        url: &str,
        allowed: Option<&HashSet<String>>,
    ) -> Result<Vec<LinkRecord>> {
        let base = Url::parse(url)?;
        let html = self.client.fetch_text(url).await?;
        let links = extract_links(&html, &base, allowed, self.text_limit);
        tracing::debug!("Found {} links on {}", links.len(), url);
        Ok(links)
    }
}

/// Extract downloadable links from an HTML document.
///
/// Hrefs are resolved against `base`; links are deduplicated by their
/// resolved URL, keeping the first occurrence in document order.
pub fn extract_links(
    html: &str,
    base: &Url,
    allowed: Option<&HashSet<String>>,
    text_limit: usize,
) -> Vec<LinkRecord> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for anchor in document.select(&ANCHOR) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let href = href.trim();
        if href.is_empty() {
            continue;
        }

        let Ok(resolved) = base.join(href) else {
            tracing::debug!("Skipping unresolvable href: {}", href);
            continue;
        };
        let full_url = resolved.to_string();
        let extension = extension_of(&full_url);

        if let Some(allowed) = allowed {
            if !allowed.is_empty() && !allowed.contains(&extension) {
                continue;
            }
        }
        if !is_downloadable(&extension) {
            continue;
        }
        if !seen.insert(full_url.clone()) {
            continue;
        }

        let text: String = anchor.text().collect();
        links.push(LinkRecord::new(full_url, &text, extension, text_limit));
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::scrape::link::NO_DESCRIPTION;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PAGE: &str = r#"
        <html><body>
          <a href="files/report.pdf"> Annual <b>Report</b> </a>
          <a href="https://example.com/docs/files/report.pdf">Duplicate</a>
          <a href="../data.CSV?v=3">Data</a>
          <a href="/about.html">About</a>
          <a href="">Empty</a>
          <a href="/img/photo.jpg"></a>
          <a name="anchor-only">No href</a>
        </body></html>
    "#;

    fn base() -> Url {
        Url::parse("https://example.com/docs/index.html").unwrap()
    }

    #[test]
    fn test_extract_resolves_and_dedups() {
        let links = extract_links(PAGE, &base(), None, 100);
        let urls: Vec<_> = links.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://example.com/docs/files/report.pdf",
                "https://example.com/data.CSV?v=3",
                "https://example.com/img/photo.jpg",
            ]
        );
        assert_eq!(links[0].text, "Annual Report");
        assert_eq!(links[1].extension, "csv");
        assert_eq!(links[2].text, NO_DESCRIPTION);
    }

    #[test]
    fn test_extract_with_filter() {
        let allowed: HashSet<String> = ["pdf".to_string()].into();
        let links = extract_links(PAGE, &base(), Some(&allowed), 100);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].extension, "pdf");
    }

    #[test]
    fn test_filter_cannot_admit_non_downloadable() {
        let allowed: HashSet<String> = ["html".to_string()].into();
        assert!(extract_links(PAGE, &base(), Some(&allowed), 100).is_empty());
    }

    #[test]
    fn test_text_is_truncated() {
        let html = format!(r#"<a href="a.pdf">{}</a>"#, "x".repeat(250));
        let links = extract_links(&html, &base(), None, 100);
        assert_eq!(links[0].text.chars().count(), 100);
    }

    #[tokio::test]
    async fn test_scrape_page_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/docs/index.html"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
            .mount(&server)
            .await;

        let scraper = LinkScraper::new(&ScraperConfig::default()).unwrap();
        let links = scraper
            .scrape_page(&format!("{}/docs/index.html", server.uri()), None)
            .await
            .unwrap();

        // The absolute example.com link is a different host here, so it survives.
        assert_eq!(links.len(), 4);
        assert_eq!(links[0].url, format!("{}/docs/files/report.pdf", server.uri()));
        assert_eq!(links[1].url, "https://example.com/docs/files/report.pdf");
    }

    #[tokio::test]
    async fn test_scrape_page_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = HttpClient::new("test", Duration::from_secs(5)).unwrap();
        let scraper = LinkScraper::with_client(client, 100);
        let err = scraper
            .scrape_page(&format!("{}/broken", server.uri()), None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Fetch { .. }));
    }
}
