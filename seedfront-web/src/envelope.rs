//! Standard wrapper around v1 API payloads.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Local time with offset, as the envelope and problem bodies carry it.
pub fn now_timestamp() -> String {
    chrono::Local::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, false)
}

/// Fresh identifier for correlating a response with logs.
pub fn trace_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Successful v1 response.
///
/// Serializes as `{type, success, status, timestamp, traceId, data}` plus
/// `total` and `message` when set.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T: Serialize> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub success: bool,
    pub status: u16,
    pub timestamp: String,
    pub trace_id: String,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> Envelope<T> {
    /// 200 envelope around `data`.
    pub fn ok(kind: &'static str, data: T) -> Self {
        Self {
            kind,
            success: true,
            status: StatusCode::OK.as_u16(),
            timestamp: now_timestamp(),
            trace_id: trace_id(),
            data,
            total: None,
            message: None,
        }
    }

    /// Sets the count of matching items before paging.
    pub fn with_total(mut self, total: u64) -> Self {
        self.total = Some(total);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_fields() {
        let envelope = Envelope::ok("Upload", vec![1, 2, 3]).with_total(10);
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value["type"], "Upload");
        assert_eq!(value["success"], true);
        assert_eq!(value["status"], 200);
        assert_eq!(value["total"], 10);
        assert_eq!(value["data"], serde_json::json!([1, 2, 3]));
        assert!(value["traceId"].as_str().is_some_and(|id| id.len() == 36));
        assert!(value.get("message").is_none());
    }

    #[test]
    fn test_timestamp_has_offset() {
        let ts = now_timestamp();
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok(), "{ts}");
    }
}
