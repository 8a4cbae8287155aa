//! `/api/v1/uploads`

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use seedfront_core::db::{Upload, UploadFilter, queries};
use serde::Serialize;
use serde_json::Value;

use super::{iso_or_zero, parse_id, query};
use crate::envelope::Envelope;
use crate::errors::ApiError;
use crate::params::StrictListParams;
use crate::server::AppState;

const KIND: &str = "Upload";

/// An uploaded torrent as the v1 API exposes it.
#[derive(Debug, Serialize)]
pub struct UploadItem {
    pub id: i64,
    pub name: String,
    pub announce: Option<String>,
    pub sent: Value,
}

impl From<Upload> for UploadItem {
    fn from(upload: Upload) -> Self {
        Self {
            id: upload.id,
            name: upload.name,
            announce: upload.announce,
            sent: iso_or_zero(&upload.sent),
        }
    }
}

fn not_found(id: i64) -> ApiError {
    ApiError::not_found(format!("Upload {id} doesn't exist"))
}

/// `GET /api/v1/uploads`
pub async fn list_uploads(
    State(state): State<AppState>,
    Query(raw): Query<HashMap<String, String>>,
) -> Result<Envelope<Vec<UploadItem>>, ApiError> {
    let params = StrictListParams::parse(&raw)?;
    let filter = UploadFilter {
        search: params.search,
        limit: params.limit,
        offset: params.offset,
    };
    let (rows, total) = query(&state, move |conn| {
        Ok((
            queries::list_uploads(conn, &filter)?,
            queries::count_uploads(conn, &filter)?,
        ))
    })
    .await?;

    Ok(Envelope::ok(KIND, rows.into_iter().map(UploadItem::from).collect()).with_total(total))
}

/// `GET /api/v1/uploads/{id}`
pub async fn get_upload(
    State(state): State<AppState>,
    id: Path<String>,
) -> Result<Envelope<UploadItem>, ApiError> {
    let id = parse_id(id)?;
    let upload = query(&state, move |conn| queries::get_upload(conn, id))
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Envelope::ok(KIND, UploadItem::from(upload)))
}

/// `DELETE /api/v1/uploads/{id}`
///
/// Clears the response cache so lists and counts stop showing the row.
pub async fn delete_upload(
    State(state): State<AppState>,
    id: Path<String>,
) -> Result<Envelope<Option<UploadItem>>, ApiError> {
    let id = parse_id(id)?;
    let deleted = query(&state, move |conn| queries::delete_upload(conn, id)).await?;
    if deleted == 0 {
        return Err(not_found(id));
    }

    tracing::info!("Deleted upload {id}");
    state.cache.clear();
    Ok(Envelope::ok(KIND, None).with_message(format!("Upload {id} deleted.")))
}
