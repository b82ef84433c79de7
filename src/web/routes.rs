//! API request handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::validate_url;
use crate::jobs::{archive_job, archive_name, JobSnapshot};
use crate::pagination::RangePolicy;
use crate::scrape::LinkRecord;
use crate::web::scrape::{run_scrape, ScrapeRequest, ScrapeResponse};
use crate::web::{ApiError, AppState};

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>linkgrab</title>
</head>
<body>
  <h1>linkgrab</h1>
  <p>Find downloadable files on web pages and fetch them in the background.</p>
  <ul>
    <li><code>POST /api/scrape</code> with <code>{"url", "pagination_mode", "url_pattern", "page_range", "extensions"}</code></li>
    <li><code>POST /api/download</code> with <code>{"links": [...]}</code> returns a <code>job_id</code></li>
    <li><code>GET /api/job/{job_id}</code> reports progress</li>
    <li><code>GET /api/download-zip/{job_id}</code> returns the files of a completed job</li>
  </ul>
</body>
</html>
"#;

#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    #[serde(default)]
    pub links: Vec<LinkRecord>,
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn scrape(
    State(state): State<AppState>,
    payload: Result<Json<ScrapeRequest>, JsonRejection>,
) -> Result<Json<ScrapeResponse>, ApiError> {
    let request = body(payload)?;
    let url = request
        .target_url()
        .ok_or_else(|| ApiError::BadRequest("URL is required".to_string()))?;
    validate_url(url).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let response = run_scrape(
        &request,
        url,
        &state.scraper,
        &state.detector,
        RangePolicy::Fallback,
    )
    .await?;
    Ok(Json(response))
}

pub async fn download(
    State(state): State<AppState>,
    payload: Result<Json<DownloadRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let request = body(payload)?;
    if request.links.is_empty() {
        return Err(ApiError::BadRequest("No links provided".to_string()));
    }

    let submitted = state.jobs.submit(request.links);
    Ok(Json(json!({ "success": true, "job_id": submitted.id })))
}

pub async fn job_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JobSnapshot>, ApiError> {
    Ok(Json(state.jobs.registry().snapshot(&id)?))
}

pub async fn download_zip(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let bytes = archive_job(state.jobs.registry(), &id).await?;
    let disposition = format!("attachment; filename=\"{}\"", archive_name(&id));

    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}
