//! Cached responses and their invalidation

use axum::http::StatusCode;

use crate::harness::TestApp;

#[tokio::test]
async fn test_stats_replayed_until_delete() {
    let app = TestApp::with_cache();

    let first = app.get("/api/v1/downloads/stats/year").await.json();
    let second = app.get("/api/v1/downloads/stats/year").await.json();
    assert_eq!(first["traceId"], second["traceId"]);

    assert_eq!(app.delete("/api/v1/uploads/1").await.status, StatusCode::OK);

    let third = app.get("/api/v1/downloads/stats/year").await.json();
    assert_ne!(first["traceId"], third["traceId"]);
    assert_eq!(first["data"], third["data"]);
}

#[tokio::test]
async fn test_pages_cached_per_locale() {
    let app = TestApp::with_cache();

    let english = app.get("/stats").await.text();
    let french = app.get_localized("/stats", "fr").await.text();
    assert!(english.contains("Statistics"));
    assert!(french.contains("Statistiques"));
    assert_eq!(app.get("/stats").await.text(), english);
    assert!(app.state.cache.len() >= 2);
}

#[tokio::test]
async fn test_lists_never_cached() {
    let app = TestApp::with_cache();

    let before = app.get("/api/v1/uploads?limit=5").await.json();
    app.delete("/api/v1/uploads/1200").await;
    let after = app.get("/api/v1/uploads?limit=5").await.json();

    assert_ne!(before["data"][0]["id"], after["data"][0]["id"]);
    assert_eq!(after["data"][0]["id"], 1199);
}

#[tokio::test]
async fn test_errors_not_cached() {
    let app = TestApp::with_cache();
    app.get("/api/v1/locks/nope").await;
    app.get("/no/such/page").await;
    assert!(app.state.cache.is_empty());
}
