//! JSON API handlers, legacy and v1

pub mod downloads;
pub mod legacy;
pub mod locks;
pub mod uploads;

use axum::Json;
use axum::extract::Path;
use axum::http::Uri;
use axum::response::{IntoResponse, Response};
use seedfront_core::db::{Connection, DbError, Timestamp, queries};
use seedfront_core::{Period, units};
use serde_json::{Value, json};

use crate::cache::{API_STATS_TTL, cache_key};
use crate::errors::ApiError;
use crate::i18n::Locale;
use crate::server::AppState;

/// Endpoints listed by the v1 index.
const V1_ENDPOINTS: [&str; 8] = [
    "/api/v1/downloads",
    "/api/v1/downloads/{id}",
    "/api/v1/downloads/stats/month",
    "/api/v1/downloads/stats/year",
    "/api/v1/uploads",
    "/api/v1/uploads/{id}",
    "/api/v1/locks",
    "/api/v1/locks/{key}",
];

/// `GET /api/v1/`
pub async fn api_index() -> Json<Value> {
    Json(json!({
        "name": "SeedFront API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": V1_ENDPOINTS,
    }))
}

/// Parses an integer id from the path; anything else is an unknown route.
pub(crate) fn parse_id(Path(raw): Path<String>) -> Result<i64, ApiError> {
    raw.parse::<i64>().map_err(|_| ApiError::route_not_found())
}

/// `0` for an unset timestamp, the ISO text otherwise.
pub(crate) fn iso_or_zero(ts: &Timestamp) -> Value {
    ts.iso8601().map_or_else(|| Value::from(0), Value::from)
}

pub(crate) fn http_date_or_zero(ts: &Timestamp) -> Value {
    ts.http_date().map_or_else(|| Value::from(0), Value::from)
}

pub(crate) fn human_size(bytes: Option<i64>) -> Option<String> {
    bytes.map(|b| units::sizeof(b as f64))
}

/// Serves period statistics, cached for an hour.
///
/// `wrap` turns the buckets into the endpoint's response body.
pub(crate) async fn cached_period_stats<R, W>(
    state: AppState,
    uri: Uri,
    period: Period,
    wrap: W,
) -> Response
where
    R: IntoResponse,
    W: FnOnce(Vec<seedfront_core::PeriodStat>) -> R,
{
    let key = cache_key(&axum::http::Method::GET, &uri, Locale::En);
    let cache = state.cache.clone();
    cache
        .get_or_render(key, API_STATS_TTL, || async move {
            let result = state
                .database
                .run(move |conn| queries::period_stats(conn, period))
                .await;
            match result {
                Ok(stats) => wrap(stats).into_response(),
                Err(err) => ApiError::from(err).into_response(),
            }
        })
        .await
}

/// Runs a query and maps database failures to a problem response.
pub(crate) async fn query<T, F>(state: &AppState, operation: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&Connection) -> Result<T, DbError> + Send + 'static,
{
    Ok(state.database.run(operation).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_or_zero() {
        assert_eq!(iso_or_zero(&Timestamp::Unset), json!(0));
        assert_eq!(
            iso_or_zero(&Timestamp::parse("2025-05-20 21:50:46")),
            json!("2025-05-20T21:50:46")
        );
    }

    #[test]
    fn test_http_date_or_zero() {
        assert_eq!(http_date_or_zero(&Timestamp::Unset), json!(0));
        assert_eq!(
            http_date_or_zero(&Timestamp::parse("2025-05-20 21:50:46")),
            json!("Tue, 20 May 2025 21:50:46 GMT")
        );
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id(Path("42".to_string())), Ok(42));
        assert!(parse_id(Path("abc".to_string())).is_err());
    }
}
