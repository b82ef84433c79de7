//! HTTP client shared by the scraper, pagination detector and downloader.

use std::time::Duration;

use reqwest::{header, Client, Response};

use crate::error::{Error, Result};

/// Thin wrapper around a configured `reqwest` client.
///
/// Every request carries the configured user agent and timeout; any
/// non-success status is turned into [`Error::Fetch`].
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Build a client with a browser-like user agent and a fixed timeout.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Send a GET request and return the response whatever its status.
    ///
    /// The raw `reqwest` error is kept so callers can tell timeouts apart.
    pub async fn send(&self, url: &str) -> reqwest::Result<Response> {
        tracing::debug!("GET {}", url);
        self.client
            .get(url)
            .header(header::ACCEPT, "*/*")
            .send()
            .await
    }

    /// Send a GET request and fail on transport errors or non-success status.
    pub async fn get(&self, url: &str) -> Result<Response> {
        let response = self.send(url).await.map_err(|e| Error::fetch(url, e))?;

        let status = response.status();
        tracing::debug!("Response status: {}", status);

        if !status.is_success() {
            return Err(Error::fetch(url, format!("HTTP {}", status)));
        }

        Ok(response)
    }

    /// Fetch a page and return its body as text.
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self.get(url).await?;
        let text = response.text().await.map_err(|e| Error::fetch(url, e))?;
        tracing::debug!("Fetched {} ({} bytes)", url, text.len());
        Ok(text)
    }
}
