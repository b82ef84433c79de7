//! Local HTTP API.
//!
//! Endpoints:
//! - `POST /api/scrape`: scrape one or more pages for links
//! - `POST /api/download`: start a background download job
//! - `GET /api/job/{id}`: poll a job
//! - `GET /api/download-zip/{id}`: fetch a completed job as a ZIP archive
//!
//! [`function`] holds the stateless variant of the scrape endpoint.

pub mod function;
pub mod routes;
pub mod scrape;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::jobs::{JobRegistry, JobRunner};
use crate::pagination::PaginationDetector;
use crate::scrape::LinkScraper;

pub use scrape::{ScrapeRequest, ScrapeResponse};

/// State shared by every request handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub scraper: LinkScraper,
    pub detector: Arc<PaginationDetector>,
    pub jobs: JobRunner,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let scraper = LinkScraper::new(&config.scraper)?;
        let detector = PaginationDetector::new(&config.pagination)?;
        let jobs = JobRunner::new(&config, JobRegistry::new());

        Ok(Self {
            config: Arc::new(config),
            scraper,
            detector: Arc::new(detector),
            jobs,
        })
    }
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/api/scrape", post(routes::scrape))
        .route("/api/download", post(routes::download))
        .route("/api/job/{id}", get(routes::job_status))
        .route("/api/download-zip/{id}", get(routes::download_zip))
        .with_state(state)
}

/// Error returned by API handlers, rendered as `{"error": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    BadGateway(String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(m)
            | ApiError::NotFound(m)
            | ApiError::BadGateway(m)
            | ApiError::Internal(m) => m,
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::JobNotFound(_) => ApiError::NotFound("Job not found".to_string()),
            Error::JobState { .. } => ApiError::BadRequest("Job not completed yet".to_string()),
            Error::Fetch { .. } => ApiError::BadGateway(err.to_string()),
            err if err.is_client_error() => ApiError::BadRequest(err.to_string()),
            err => ApiError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status().is_server_error() {
            tracing::error!("Request failed: {}", self.message());
        } else {
            tracing::debug!("Rejected request: {}", self.message());
        }
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}
