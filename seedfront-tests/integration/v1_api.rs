//! Enveloped `/api/v1` endpoints and problem responses

use axum::http::StatusCode;
use seedfront_core::test_fixtures::{FINISHED_DOWNLOADS, IN_PROGRESS_DOWNLOADS, SIZED_DOWNLOADS, UPLOADS};

use crate::harness::TestApp;

#[tokio::test]
async fn test_index_lists_endpoints() {
    let app = TestApp::new();
    let body = app.get("/api/v1/").await.json();
    assert_eq!(body["name"], "SeedFront API");
    assert!(
        body["endpoints"]
            .as_array()
            .unwrap()
            .iter()
            .any(|e| e == "/api/v1/locks/{key}")
    );
}

#[tokio::test]
async fn test_downloads_envelope() {
    let app = TestApp::new();
    let response = app.get("/api/v1/downloads").await;
    assert_eq!(response.status, StatusCode::OK);

    let body = response.json();
    assert_eq!(body["type"], "Download");
    assert_eq!(body["success"], true);
    assert_eq!(body["status"], 200);
    assert_eq!(body["traceId"].as_str().unwrap().len(), 36);
    assert_eq!(body["data"].as_array().unwrap().len(), 50);
    assert!(body.get("total").is_none());
}

#[tokio::test]
async fn test_downloads_filters() {
    let app = TestApp::new();

    let body = app.get("/api/v1/downloads?finished=false").await.json();
    assert_eq!(body["data"].as_array().unwrap().len() as i64, IN_PROGRESS_DOWNLOADS);

    let body = app.get("/api/v1/downloads?finished=true&limit=1000&offset=1000").await.json();
    assert_eq!(
        body["data"].as_array().unwrap().len() as i64,
        FINISHED_DOWNLOADS - 1000
    );

    let body = app.get("/api/v1/downloads?search=unknown-size").await.json();
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert!(data[0]["seedbox_size"].is_null());
}

#[tokio::test]
async fn test_limit_is_clamped() {
    let app = TestApp::new();

    let body = app.get("/api/v1/uploads?limit=1001").await.json();
    assert_eq!(body["data"].as_array().unwrap().len(), 1000);
    assert_eq!(body["total"], UPLOADS);

    let body = app.get("/api/v1/uploads?limit=1").await.json();
    assert_eq!(body["data"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_invalid_query_is_rejected() {
    let app = TestApp::new();
    for (uri, field) in [
        ("/api/v1/downloads?limit=abc", "limit"),
        ("/api/v1/uploads?offset=-1", "offset"),
        ("/api/v1/downloads?finished=maybe", "finished"),
    ] {
        let response = app.get(uri).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(response.content_type(), "application/problem+json");

        let body = response.json();
        assert_eq!(body["title"], "Input payload validation failed");
        assert_eq!(body["status"], 400);
        assert!(body["errors"][field].is_string(), "{uri}");
    }
}

#[tokio::test]
async fn test_single_download() {
    let app = TestApp::new();

    let body = app.get("/api/v1/downloads/1").await.json();
    assert_eq!(body["data"]["id"], 1);
    assert!(body["data"]["started"].as_str().unwrap().starts_with("2019-01-02T"));

    let response = app.get(&format!("/api/v1/downloads/{}", SIZED_DOWNLOADS * 10)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json()["title"], "Download 10000 doesn't exist");

    let response = app.get("/api/v1/downloads/abc").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json()["title"], "Not Found");
}

#[tokio::test]
async fn test_uploads_items() {
    let app = TestApp::new();
    let body = app.get("/api/v1/uploads?limit=5").await.json();
    let data = body["data"].as_array().unwrap();

    assert_eq!(body["type"], "Upload");
    assert_eq!(data[0]["id"], UPLOADS);
    assert!(data[0]["announce"].is_null());
    assert_eq!(data[1]["announce"], "https://tracker.example/announce");
    assert!(data[0]["sent"].as_str().unwrap().ends_with(".101200"));

    let body = app.get("/api/v1/uploads?search=Upload_000").await.json();
    assert_eq!(body["total"], 9);
}

#[tokio::test]
async fn test_delete_upload() {
    let app = TestApp::new();

    let response = app.delete("/api/v1/uploads/7").await;
    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert!(body["data"].is_null());
    assert_eq!(body["message"], "Upload 7 deleted.");

    assert_eq!(app.get("/api/v1/uploads/7").await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.delete("/api/v1/uploads/7").await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.get("/api/v1/uploads").await.json()["total"], UPLOADS - 1);
}

#[tokio::test]
async fn test_locks() {
    let app = TestApp::new();

    let body = app.get("/api/v1/locks").await.json();
    let keys: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|lock| lock["key"].as_str().unwrap())
        .collect();
    assert_eq!(keys, ["sync_blackhole", "sync_seedbox"]);

    let body = app.get("/api/v1/locks/sync_seedbox").await.json();
    assert_eq!(body["type"], "Lock");
    assert_eq!(body["data"]["locked"], true);
    assert_eq!(body["data"]["pid"], 84074);
    assert!(body["data"]["unlocked_at"].is_null());

    let response = app.get("/api/v1/locks/nope").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json()["title"], "Lock nope doesn't exist");
}

#[tokio::test]
async fn test_stats_envelopes() {
    let app = TestApp::new();

    let body = app.get("/api/v1/downloads/stats/year").await.json();
    assert_eq!(body["type"], "StatsYear");
    let files: u64 = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|bucket| bucket["files"].as_u64().unwrap())
        .sum();
    assert_eq!(files as i64, SIZED_DOWNLOADS);

    let body = app.get("/api/v1/downloads/stats/month").await.json();
    assert_eq!(body["type"], "StatsMonth");
    assert!(body["data"][0]["month"].as_str().unwrap().starts_with("2019-"));
}

#[tokio::test]
async fn test_unknown_stats_period_is_not_found() {
    let app = TestApp::new();
    let response = app.get("/api/v1/downloads/stats/week").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json()["title"], "Not Found");
}

#[tokio::test]
async fn test_unknown_api_path_is_problem() {
    let app = TestApp::new();
    let response = app.get("/api/v1/nothing-here").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.content_type(), "application/problem+json");
    let body = response.json();
    assert_eq!(body["type"], "about:blank");
    assert_eq!(body["title"], "Not Found");
}

#[tokio::test]
async fn test_missing_database_is_server_error() {
    let app = TestApp::without_database();
    let response = app.get("/api/v1/uploads").await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.json()["detail"].as_str().unwrap().contains("gone.db"));
}
