//! Legacy `/api` endpoints: bare JSON arrays, lenient `limit`.

use std::collections::HashMap;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::Uri;
use axum::response::Response;
use seedfront_core::Period;
use seedfront_core::db::queries;
use seedfront_core::db::{Download, DownloadFilter, Upload, UploadFilter};
use serde::Serialize;
use serde_json::{Value, json};

use super::{cached_period_stats, http_date_or_zero, human_size, query};
use crate::errors::ApiError;
use crate::params::{LEGACY_DEFAULT_LIMIT, LENIENT_MAX_LIMIT, lenient_limit};
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct LegacyUpload {
    pub id: i64,
    pub name: String,
    pub sent: Value,
}

impl From<Upload> for LegacyUpload {
    fn from(upload: Upload) -> Self {
        Self {
            id: upload.id,
            name: upload.name,
            sent: http_date_or_zero(&upload.sent),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LegacyDownload {
    pub id: i64,
    pub path: String,
    pub finished: Value,
    pub local_size: Option<String>,
}

impl From<Download> for LegacyDownload {
    fn from(download: Download) -> Self {
        Self {
            id: download.id,
            path: download.path,
            finished: http_date_or_zero(&download.finished),
            local_size: human_size(download.local_size),
        }
    }
}

fn limit(params: &HashMap<String, String>) -> u32 {
    lenient_limit(
        params.get("limit").map(String::as_str),
        LEGACY_DEFAULT_LIMIT,
        LENIENT_MAX_LIMIT,
    )
}

/// `GET /api/`
pub async fn api_root() -> Json<Value> {
    Json(json!({}))
}

/// `GET /api/uploads`, newest first.
pub async fn uploads(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<LegacyUpload>>, ApiError> {
    let filter = UploadFilter {
        limit: limit(&params),
        ..UploadFilter::default()
    };
    let rows = query(&state, move |conn| queries::list_uploads(conn, &filter)).await?;
    Ok(Json(rows.into_iter().map(LegacyUpload::from).collect()))
}

async fn download_list(
    state: &AppState,
    params: &HashMap<String, String>,
    finished: bool,
) -> Result<Json<Vec<LegacyDownload>>, ApiError> {
    let filter = DownloadFilter {
        finished: Some(finished),
        limit: limit(params),
        ..DownloadFilter::default()
    };
    let rows = query(state, move |conn| queries::list_downloads(conn, &filter)).await?;
    Ok(Json(rows.into_iter().map(LegacyDownload::from).collect()))
}

/// `GET /api/downloads`: finished downloads, newest first.
pub async fn downloads(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<LegacyDownload>>, ApiError> {
    download_list(&state, &params, true).await
}

/// `GET /api/progress`: downloads still running.
pub async fn progress(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<LegacyDownload>>, ApiError> {
    download_list(&state, &params, false).await
}

/// `GET /api/stats-by-month`
pub async fn stats_by_month(State(state): State<AppState>, uri: Uri) -> Response {
    cached_period_stats(state, uri, Period::Month, Json).await
}

/// `GET /api/stats-by-year`
pub async fn stats_by_year(State(state): State<AppState>, uri: Uri) -> Response {
    cached_period_stats(state, uri, Period::Year, Json).await
}
