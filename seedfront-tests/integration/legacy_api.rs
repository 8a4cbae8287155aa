//! Legacy `/api` endpoints

use axum::http::StatusCode;
use seedfront_core::test_fixtures::{IN_PROGRESS_DOWNLOADS, UNSIZED_DOWNLOAD_ID, UPLOADS};

use crate::harness::TestApp;

#[tokio::test]
async fn test_api_root_is_empty_object() {
    let app = TestApp::new();
    for uri in ["/api", "/api/"] {
        let response = app.get(uri).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.json(), serde_json::json!({}));
    }
}

#[tokio::test]
async fn test_uploads_default_to_five_newest() {
    let app = TestApp::new();
    let body = app.get("/api/uploads").await.json();
    let items = body.as_array().unwrap();

    assert_eq!(items.len(), 5);
    assert_eq!(items[0]["id"], UPLOADS);
    assert_eq!(items[0]["name"], "Upload_1200.torrent");
    assert!(items[0]["sent"].as_str().unwrap().ends_with(" GMT"));
    assert!(items[0].get("announce").is_none());
}

#[tokio::test]
async fn test_uploaded_alias() {
    let app = TestApp::new();
    assert_eq!(
        app.get("/api/uploaded?limit=3").await.json(),
        app.get("/api/uploads?limit=3").await.json()
    );
}

#[tokio::test]
async fn test_limit_out_of_range_falls_back() {
    let app = TestApp::new();
    for limit in ["1001", "0", "-4", "many"] {
        let body = app.get(&format!("/api/uploads?limit={limit}")).await.json();
        assert_eq!(body.as_array().unwrap().len(), 5, "limit={limit}");
    }
    let body = app.get("/api/uploads?limit=1000").await.json();
    assert_eq!(body.as_array().unwrap().len(), 1000);
}

#[tokio::test]
async fn test_downloads_are_finished_and_sized() {
    let app = TestApp::new();
    let body = app.get("/api/downloads?limit=2").await.json();
    let items = body.as_array().unwrap();

    assert_eq!(items[0]["id"], UNSIZED_DOWNLOAD_ID);
    assert!(items[0]["local_size"].is_null());
    assert!(items[1]["local_size"].as_str().unwrap().ends_with("iB"));
    assert!(items[1]["finished"].as_str().unwrap().ends_with(" GMT"));
}

#[tokio::test]
async fn test_progress_lists_unfinished() {
    let app = TestApp::new();
    let body = app.get("/api/progress").await.json();
    let items = body.as_array().unwrap();

    assert_eq!(items.len() as i64, IN_PROGRESS_DOWNLOADS);
    assert!(items.iter().all(|item| item["finished"] == 0));
}

#[tokio::test]
async fn test_stats_are_bare_sorted_arrays() {
    let app = TestApp::new();

    let years = app.get("/api/stats-by-year").await.json();
    let years = years.as_array().unwrap();
    assert_eq!(years[0]["year"], "2019");
    assert!(years.iter().all(|bucket| bucket["total_size"].as_str().unwrap().ends_with("GiB")));

    let months = app.get("/api/stats-by-month").await.json();
    let keys: Vec<&str> = months
        .as_array()
        .unwrap()
        .iter()
        .map(|bucket| bucket["month"].as_str().unwrap())
        .collect();
    let mut sorted = keys.clone();
    sorted.sort_unstable();
    assert_eq!(keys, sorted);
}
