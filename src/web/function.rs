//! Stateless scrape function and download proxy.
//!
//! Serverless platforms hand the function an event with the HTTP method and
//! raw body and expect `{statusCode, headers, body}` back. [`handle`] and
//! [`proxy_handle`] work on those shapes directly; [`router`] exposes both
//! over axum for `linkgrab-web --stateless`.
//!
//! Compared with `/api/scrape` the function uses a shorter page timeout,
//! caps manual page ranges and treats auto mode as single-page.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use futures::StreamExt;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::client::HttpClient;
use crate::config::{validate_url, Config, PaginationMode};
use crate::error::Result;
use crate::pagination::{PaginationDetector, RangePolicy};
use crate::scrape::LinkScraper;
use crate::web::scrape::{run_scrape, ScrapeRequest, ScrapeResponse};

/// Incoming function event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FunctionRequest {
    #[serde(rename = "httpMethod", alias = "http_method", default)]
    pub http_method: String,
    #[serde(default)]
    pub body: Option<String>,
}

/// Function result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    /// `body` holds base64 of a binary payload.
    #[serde(rename = "isBase64Encoded")]
    pub is_base64_encoded: bool,
}

impl FunctionResponse {
    fn new(status_code: u16, body: String) -> Self {
        let headers = [
            ("Access-Control-Allow-Origin", "*"),
            ("Access-Control-Allow-Headers", "Content-Type"),
            ("Access-Control-Allow-Methods", "POST, OPTIONS"),
            ("Content-Type", "application/json"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            status_code,
            headers,
            body,
            is_base64_encoded: false,
        }
    }

    fn error(status_code: u16, message: impl Into<String>) -> Self {
        Self::new(status_code, json!({ "error": message.into() }).to_string())
    }

    fn binary(bytes: &[u8], content_type: &str) -> Self {
        let mut response = Self::new(200, STANDARD.encode(bytes));
        response
            .headers
            .insert("Content-Type".to_string(), content_type.to_string());
        response.is_base64_encoded = true;
        response
    }
}

/// Handle one function invocation.
pub async fn handle(config: &Config, request: FunctionRequest) -> FunctionResponse {
    if request.http_method.eq_ignore_ascii_case("OPTIONS") {
        return FunctionResponse::new(200, String::new());
    }

    let body = request.body.as_deref().unwrap_or("{}");
    let mut scrape: ScrapeRequest = match serde_json::from_str(body) {
        Ok(scrape) => scrape,
        Err(e) => return FunctionResponse::error(400, format!("Invalid JSON body: {}", e)),
    };

    let Some(url) = scrape.target_url().map(str::to_string) else {
        return FunctionResponse::error(400, "URL is required");
    };

    if scrape.pagination_mode == PaginationMode::Auto {
        tracing::debug!("Auto pagination is not available here, scraping a single page");
        scrape.pagination_mode = PaginationMode::Single;
    }

    match scrape_once(config, &scrape, &url).await {
        Ok(response) => match serde_json::to_string(&response) {
            Ok(body) => FunctionResponse::new(200, body),
            Err(e) => FunctionResponse::error(500, e.to_string()),
        },
        Err(e) if e.is_client_error() => FunctionResponse::error(400, e.to_string()),
        Err(e) => {
            tracing::warn!("Scrape of {} failed: {}", url, e);
            FunctionResponse::error(500, e.to_string())
        }
    }
}

async fn scrape_once(config: &Config, request: &ScrapeRequest, url: &str) -> Result<ScrapeResponse> {
    let timeout = Duration::from_secs(config.server.function_timeout_seconds);
    let client = HttpClient::new(&config.scraper.user_agent, timeout)?;
    let scraper = LinkScraper::with_client(client, config.scraper.text_limit);
    let detector = PaginationDetector::new(&config.pagination)?;
    let policy = RangePolicy::Capped(config.server.function_page_cap);

    run_scrape(request, url, &scraper, &detector, policy).await
}

#[derive(Debug, Default, Deserialize)]
struct ProxyRequest {
    #[serde(default)]
    url: Option<String>,
}

/// Why a proxied download did not produce a file.
#[derive(Debug)]
enum ProxyFailure {
    Timeout,
    Status(reqwest::StatusCode),
    TooLarge(u64),
    Other(String),
}

impl ProxyFailure {
    fn status_code(&self) -> u16 {
        match self {
            ProxyFailure::Timeout => 504,
            ProxyFailure::Status(status) => status.as_u16(),
            ProxyFailure::TooLarge(_) => 413,
            ProxyFailure::Other(_) => 500,
        }
    }

    fn message(&self) -> String {
        match self {
            ProxyFailure::Timeout => "Download timeout - file too large or slow server".to_string(),
            ProxyFailure::Status(status) => format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            ),
            ProxyFailure::TooLarge(cap) => format!("File exceeds the {} byte limit", cap),
            ProxyFailure::Other(message) => format!("Failed to download file: {}", message),
        }
    }
}

impl From<reqwest::Error> for ProxyFailure {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProxyFailure::Timeout
        } else {
            ProxyFailure::Other(err.to_string())
        }
    }
}

/// Fetch one file server-side and hand it back base64-encoded.
///
/// Browser clients use this for files whose host does not allow
/// cross-origin requests. Upstream error statuses are passed through.
pub async fn proxy_handle(config: &Config, request: FunctionRequest) -> FunctionResponse {
    if request.http_method.eq_ignore_ascii_case("OPTIONS") {
        return FunctionResponse::new(200, String::new());
    }

    let body = request.body.as_deref().unwrap_or("{}");
    let proxy: ProxyRequest = match serde_json::from_str(body) {
        Ok(proxy) => proxy,
        Err(e) => return FunctionResponse::error(400, format!("Invalid JSON body: {}", e)),
    };

    let Some(url) = proxy.url.as_deref().map(str::trim).filter(|u| !u.is_empty()) else {
        return FunctionResponse::error(400, "URL is required");
    };
    if let Err(e) = validate_url(url) {
        return FunctionResponse::error(400, e.to_string());
    }

    match fetch_capped(config, url).await {
        Ok((content_type, bytes)) => {
            tracing::debug!("Proxied {} ({} bytes, {})", url, bytes.len(), content_type);
            FunctionResponse::binary(&bytes, &content_type)
        }
        Err(failure) => {
            tracing::warn!("Proxy download of {} failed: {}", url, failure.message());
            FunctionResponse::new(
                failure.status_code(),
                json!({ "error": failure.message(), "url": url }).to_string(),
            )
        }
    }
}

async fn fetch_capped(
    config: &Config,
    url: &str,
) -> std::result::Result<(String, Vec<u8>), ProxyFailure> {
    let timeout = Duration::from_secs(config.server.proxy_timeout_seconds);
    let cap = config.server.proxy_max_bytes;
    let client = HttpClient::new(&config.scraper.user_agent, timeout)
        .map_err(|e| ProxyFailure::Other(e.to_string()))?;

    let response = client.send(url).await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ProxyFailure::Status(status));
    }
    if response.content_length().is_some_and(|len| len > cap) {
        return Err(ProxyFailure::TooLarge(cap));
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if (body.len() + chunk.len()) as u64 > cap {
            return Err(ProxyFailure::TooLarge(cap));
        }
        body.extend_from_slice(&chunk);
    }

    Ok((content_type, body))
}

/// Mount the scrape function at its serverless path and at `/api/scrape`,
/// and the download proxy at its serverless path.
pub fn router(config: Config) -> Router {
    Router::new()
        .route("/.netlify/functions/scrape", any(scrape_endpoint))
        .route("/api/scrape", any(scrape_endpoint))
        .route("/.netlify/functions/download-proxy", any(proxy_endpoint))
        .with_state(Arc::new(config))
}

fn event(method: Method, body: Bytes) -> FunctionRequest {
    FunctionRequest {
        http_method: method.to_string(),
        body: (!body.is_empty()).then(|| String::from_utf8_lossy(&body).into_owned()),
    }
}

async fn scrape_endpoint(
    State(config): State<Arc<Config>>,
    method: Method,
    body: Bytes,
) -> Response {
    handle(&config, event(method, body)).await.into_response()
}

async fn proxy_endpoint(
    State(config): State<Arc<Config>>,
    method: Method,
    body: Bytes,
) -> Response {
    proxy_handle(&config, event(method, body))
        .await
        .into_response()
}

impl IntoResponse for FunctionResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = if self.is_base64_encoded {
            match STANDARD.decode(self.body.as_bytes()) {
                Ok(bytes) => Body::from(bytes),
                Err(e) => {
                    tracing::error!("Undecodable function body: {}", e);
                    return StatusCode::INTERNAL_SERVER_ERROR.into_response();
                }
            }
        } else {
            Body::from(self.body)
        };
        let mut response = (status, body).into_response();

        for (name, value) in &self.headers {
            if let (Ok(name), Ok(value)) = (
                HeaderName::try_from(name.as_str()),
                HeaderValue::try_from(value.as_str()),
            ) {
                response.headers_mut().insert(name, value);
            }
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn post(body: serde_json::Value) -> FunctionRequest {
        FunctionRequest {
            http_method: "POST".into(),
            body: Some(body.to_string()),
        }
    }

    fn body_json(response: &FunctionResponse) -> serde_json::Value {
        serde_json::from_str(&response.body).unwrap()
    }

    #[tokio::test]
    async fn test_options_preflight() {
        let request = FunctionRequest {
            http_method: "OPTIONS".into(),
            body: None,
        };
        let response = handle(&Config::default(), request).await;
        assert_eq!(response.status_code, 200);
        assert!(response.body.is_empty());
        assert_eq!(response.headers["Access-Control-Allow-Origin"], "*");
        assert_eq!(response.headers["Access-Control-Allow-Methods"], "POST, OPTIONS");
    }

    #[tokio::test]
    async fn test_missing_url() {
        let response = handle(&Config::default(), post(serde_json::json!({}))).await;
        assert_eq!(response.status_code, 400);
        assert_eq!(body_json(&response)["error"], "URL is required");
        assert_eq!(response.headers["Access-Control-Allow-Headers"], "Content-Type");
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let request = FunctionRequest {
            http_method: "POST".into(),
            body: Some("{not json".into()),
        };
        let response = handle(&Config::default(), request).await;
        assert_eq!(response.status_code, 400);
    }

    #[tokio::test]
    async fn test_single_page_failure_is_500() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let response = handle(
            &Config::default(),
            post(serde_json::json!({ "url": format!("{}/missing", server.uri()) })),
        )
        .await;
        assert_eq!(response.status_code, 500);
        assert!(body_json(&response)["error"]
            .as_str()
            .unwrap()
            .contains("HTTP 404"));
    }

    #[tokio::test]
    async fn test_manual_range_is_capped() {
        let server = MockServer::start().await;
        for page in 1..=3 {
            Mock::given(method("GET"))
                .and(path(format!("/list/{}", page)))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_string(format!(r#"<a href="/f/{}.pdf">File {}</a>"#, page, page)),
                )
                .mount(&server)
                .await;
        }

        let mut config = Config::default();
        config.server.function_page_cap = 2;
        let response = handle(
            &config,
            post(serde_json::json!({
                "url": server.uri(),
                "pagination_mode": "manual",
                "url_pattern": format!("{}/list/{{page}}", server.uri()),
                "page_range": "1-50",
            })),
        )
        .await;

        assert_eq!(response.status_code, 200);
        let body = body_json(&response);
        assert_eq!(body["count"], 2);
        assert_eq!(body["links"][1]["text"], "File 2");
    }

    #[tokio::test]
    async fn test_auto_mode_scrapes_single_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/docs"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<a href="/page/2">2</a><a href="/r.csv">Report</a>"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let response = handle(
            &Config::default(),
            post(serde_json::json!({
                "url": format!("{}/docs", server.uri()),
                "pagination_mode": "auto",
            })),
        )
        .await;
        assert_eq!(response.status_code, 200);
        assert_eq!(body_json(&response)["count"], 1);
    }

    #[tokio::test]
    async fn test_manual_mode_without_placeholder_is_400() {
        let response = handle(
            &Config::default(),
            post(serde_json::json!({
                "url": "https://127.0.0.1:9/x",
                "pagination_mode": "manual",
                "page_range": "1-3",
            })),
        )
        .await;
        assert_eq!(response.status_code, 400);
        assert!(body_json(&response)["error"]
            .as_str()
            .unwrap()
            .contains("{page}"));
    }

    async fn file_server(template: ResponseTemplate) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files/report.pdf"))
            .respond_with(template)
            .mount(&server)
            .await;
        server
    }

    fn proxy_post(server: &MockServer) -> FunctionRequest {
        post(serde_json::json!({ "url": format!("{}/files/report.pdf", server.uri()) }))
    }

    #[tokio::test]
    async fn test_proxy_returns_base64_with_upstream_content_type() {
        let bytes = b"%PDF-1.4 report".to_vec();
        let server = file_server(
            ResponseTemplate::new(200).set_body_raw(bytes.clone(), "application/pdf"),
        )
        .await;

        let response = proxy_handle(&Config::default(), proxy_post(&server)).await;
        assert_eq!(response.status_code, 200);
        assert!(response.is_base64_encoded);
        assert_eq!(response.headers["Content-Type"], "application/pdf");
        assert_eq!(response.headers["Access-Control-Allow-Origin"], "*");
        assert_eq!(STANDARD.decode(&response.body).unwrap(), bytes);
    }

    #[tokio::test]
    async fn test_proxy_rejects_files_over_the_cap() {
        let server =
            file_server(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 4096])).await;

        let mut config = Config::default();
        config.server.proxy_max_bytes = 1024;
        let response = proxy_handle(&config, proxy_post(&server)).await;
        assert_eq!(response.status_code, 413);
        assert!(!response.is_base64_encoded);
        assert!(body_json(&response)["error"]
            .as_str()
            .unwrap()
            .contains("1024"));
    }

    #[tokio::test]
    async fn test_proxy_timeout_is_504() {
        let server = file_server(
            ResponseTemplate::new(200)
                .set_body_bytes(b"late".to_vec())
                .set_delay(Duration::from_secs(3)),
        )
        .await;

        let mut config = Config::default();
        config.server.proxy_timeout_seconds = 1;
        let response = proxy_handle(&config, proxy_post(&server)).await;
        assert_eq!(response.status_code, 504);
        assert!(body_json(&response)["error"]
            .as_str()
            .unwrap()
            .starts_with("Download timeout"));
    }

    #[tokio::test]
    async fn test_proxy_passes_upstream_status_through() {
        let server = file_server(ResponseTemplate::new(404)).await;

        let response = proxy_handle(&Config::default(), proxy_post(&server)).await;
        assert_eq!(response.status_code, 404);
        let body = body_json(&response);
        assert_eq!(body["error"], "HTTP 404: Not Found");
        assert!(body["url"].as_str().unwrap().ends_with("/files/report.pdf"));
    }

    #[tokio::test]
    async fn test_proxy_requires_url() {
        let response = proxy_handle(&Config::default(), post(serde_json::json!({}))).await;
        assert_eq!(response.status_code, 400);
        assert_eq!(body_json(&response)["error"], "URL is required");

        let preflight = FunctionRequest {
            http_method: "OPTIONS".into(),
            body: None,
        };
        let response = proxy_handle(&Config::default(), preflight).await;
        assert_eq!(response.status_code, 200);
        assert!(response.body.is_empty());
    }

    #[tokio::test]
    async fn test_router_proxy_sends_raw_bytes() {
        let server = file_server(
            ResponseTemplate::new(200).set_body_raw(b"zip-bytes".to_vec(), "application/zip"),
        )
        .await;

        let app = router(Config::default());
        let request = Request::builder()
            .method("POST")
            .uri("/.netlify/functions/download-proxy")
            .body(Body::from(
                serde_json::json!({ "url": format!("{}/files/report.pdf", server.uri()) })
                    .to_string(),
            ))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "application/zip");
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"zip-bytes");
    }

    #[tokio::test]
    async fn test_router_preflight_has_cors_headers() {
        let app = router(Config::default());
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/.netlify/functions/scrape")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty());
    }
}
