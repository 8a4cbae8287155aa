//! Error responses: problem JSON for the API, an HTML page for browsers.

use std::any::Any;
use std::collections::BTreeMap;

use axum::Json;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use seedfront_core::DbError;
use serde::Serialize;

use crate::envelope::{now_timestamp, trace_id};
use crate::i18n::Locale;
use crate::pages::error::error_page;

/// Title used for rejected query parameters.
pub const VALIDATION_TITLE: &str = "Input payload validation failed";

const NOT_FOUND_DETAIL: &str = "The requested URL was not found on the server. If you entered the URL manually please check your spelling and try again.";

/// A failed API request, rendered as a problem body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{status} {title}: {detail}")]
pub struct ApiError {
    pub status: StatusCode,
    pub title: String,
    pub detail: String,
    /// Per-field messages for validation failures
    pub errors: Option<BTreeMap<String, String>>,
}

impl ApiError {
    pub fn new(status: StatusCode, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            status,
            title: title.into(),
            detail: detail.into(),
            errors: None,
        }
    }

    /// 404 with a specific title, e.g. `Download 12 doesn't exist`.
    pub fn not_found(title: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, title, NOT_FOUND_DETAIL)
    }

    /// 404 for a path no route serves.
    pub fn route_not_found() -> Self {
        Self::not_found("Not Found")
    }

    /// 400 naming one invalid query parameter.
    pub fn invalid_field(field: &str, message: &str) -> Self {
        let mut errors = BTreeMap::new();
        errors.insert(field.to_string(), message.to_string());
        Self {
            status: StatusCode::BAD_REQUEST,
            title: VALIDATION_TITLE.to_string(),
            detail: format!("Invalid value for query parameter '{field}'"),
            errors: Some(errors),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", detail)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProblemBody<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    title: &'a str,
    status: u16,
    detail: &'a str,
    timestamp: String,
    trace_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a BTreeMap<String, String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ProblemBody {
            kind: "about:blank",
            title: &self.title,
            status: self.status.as_u16(),
            detail: &self.detail,
            timestamp: now_timestamp(),
            trace_id: trace_id(),
            errors: self.errors.as_ref(),
        };
        let mut response = (self.status, Json(body)).into_response();
        response.headers_mut().insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/problem+json"),
        );
        response
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        tracing::error!("Database request failed: {err}");
        match &err {
            DbError::Missing { .. } => Self::internal(err.to_string()),
            DbError::Sqlite(_) | DbError::Task { .. } => {
                Self::internal("The database request could not be completed")
            }
        }
    }
}

/// A failed browser request, rendered as an HTML error page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageError {
    pub status: StatusCode,
    pub locale: Locale,
}

impl PageError {
    pub fn not_found(locale: Locale) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            locale,
        }
    }

    pub fn internal(locale: Locale) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            locale,
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        (self.status, error_page(self.status, self.locale)).into_response()
    }
}

/// Handles paths no route matched.
pub async fn fallback(locale: Locale, uri: Uri) -> Response {
    if is_api_path(uri.path()) {
        ApiError::route_not_found().into_response()
    } else {
        PageError::not_found(locale).into_response()
    }
}

/// Whether a path belongs to the JSON API.
pub fn is_api_path(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

/// Converts a caught handler panic into a 500 problem.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let reason = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("Request handler panicked: {reason}");
    ApiError::internal("An unexpected error occurred").into_response()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_invalid_field_lists_errors() {
        let err = ApiError::invalid_field("limit", "must be an integer");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.title, VALIDATION_TITLE);
        assert_eq!(
            err.errors.unwrap().get("limit").map(String::as_str),
            Some("must be an integer")
        );
    }

    #[test]
    fn test_missing_database_names_path() {
        let err = ApiError::from(DbError::Missing {
            path: PathBuf::from("/srv/sync.db"),
        });
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.detail.contains("/srv/sync.db"));
    }

    #[test]
    fn test_problem_content_type() {
        let response = ApiError::route_not_found().into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "application/problem+json"
        );
    }

    #[test]
    fn test_api_path_detection() {
        assert!(is_api_path("/api"));
        assert!(is_api_path("/api/v1/nope"));
        assert!(!is_api_path("/apiary"));
        assert!(!is_api_path("/stats"));
    }
}
