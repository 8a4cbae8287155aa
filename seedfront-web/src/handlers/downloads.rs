//! `/api/v1/downloads`

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::Uri;
use axum::response::{IntoResponse, Response};
use seedfront_core::Period;
use seedfront_core::db::{Download, DownloadFilter, queries};
use serde::Serialize;
use serde_json::Value;

use super::{cached_period_stats, human_size, iso_or_zero, parse_id, query};
use crate::envelope::Envelope;
use crate::errors::ApiError;
use crate::params::StrictListParams;
use crate::server::AppState;

const KIND: &str = "Download";

/// A download as the v1 API exposes it.
#[derive(Debug, Serialize)]
pub struct DownloadItem {
    pub id: i64,
    pub path: String,
    pub started: Value,
    pub finished: Value,
    pub local_size: Option<String>,
    pub seedbox_size: Option<String>,
}

impl From<Download> for DownloadItem {
    fn from(download: Download) -> Self {
        Self {
            id: download.id,
            path: download.path,
            started: iso_or_zero(&download.started),
            finished: iso_or_zero(&download.finished),
            local_size: human_size(download.local_size),
            seedbox_size: human_size(download.seedbox_size),
        }
    }
}

/// `GET /api/v1/downloads`
pub async fn list_downloads(
    State(state): State<AppState>,
    Query(raw): Query<HashMap<String, String>>,
) -> Result<Envelope<Vec<DownloadItem>>, ApiError> {
    let params = StrictListParams::parse(&raw)?;
    let filter = DownloadFilter {
        finished: params.finished,
        search: params.search,
        limit: params.limit,
        offset: params.offset,
    };
    let rows = query(&state, move |conn| queries::list_downloads(conn, &filter)).await?;
    Ok(Envelope::ok(
        KIND,
        rows.into_iter().map(DownloadItem::from).collect(),
    ))
}

/// `GET /api/v1/downloads/{id}`
pub async fn get_download(
    State(state): State<AppState>,
    id: Path<String>,
) -> Result<Envelope<DownloadItem>, ApiError> {
    let id = parse_id(id)?;
    let download = query(&state, move |conn| queries::get_download(conn, id))
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Download {id} doesn't exist")))?;
    Ok(Envelope::ok(KIND, DownloadItem::from(download)))
}

fn stats_kind(period: Period) -> &'static str {
    match period {
        Period::Month => "StatsMonth",
        Period::Year => "StatsYear",
    }
}

/// `GET /api/v1/downloads/stats/{month|year}`
pub async fn stats_by_period(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    uri: Uri,
) -> Response {
    let Ok(period) = raw.parse::<Period>() else {
        return ApiError::route_not_found().into_response();
    };
    cached_period_stats(state, uri, period, move |stats| {
        Envelope::ok(stats_kind(period), stats)
    })
    .await
}

#[cfg(test)]
mod tests {
    use seedfront_core::db::Timestamp;

    use super::*;

    #[test]
    fn test_stats_kind_follows_period() {
        assert_eq!(stats_kind("month".parse().unwrap()), "StatsMonth");
        assert_eq!(stats_kind("Year".parse().unwrap()), "StatsYear");
        assert!("week".parse::<Period>().is_err());
    }

    #[test]
    fn test_in_progress_download_item() {
        let item = DownloadItem::from(Download {
            id: 3,
            path: "/files/a.mkv".to_string(),
            started: Timestamp::parse("2024-02-01 10:00:00"),
            finished: Timestamp::Unset,
            local_size: None,
            seedbox_size: Some(1024),
        });
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["started"], "2024-02-01T10:00:00");
        assert_eq!(value["finished"], 0);
        assert!(value["local_size"].is_null());
        assert_eq!(value["seedbox_size"], "1.0KiB");
    }
}
