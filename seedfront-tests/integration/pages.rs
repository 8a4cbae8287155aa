//! HTML pages, locale negotiation and degraded startup

use axum::http::StatusCode;

use crate::harness::TestApp;

#[tokio::test]
async fn test_pages_render() {
    let app = TestApp::new();
    for uri in ["/", "/homepage", "/stats", "/uploaded", "/downloaded", "/info", "/settings"] {
        let response = app.get(uri).await;
        assert_eq!(response.status, StatusCode::OK, "{uri}");
        assert!(response.content_type().starts_with("text/html"), "{uri}");
    }
}

#[tokio::test]
async fn test_dashboard_content() {
    let app = TestApp::new();
    let html = app.get("/").await.text();

    assert!(html.contains("Dashboard"));
    assert!(html.contains("Upload_1200.torrent"));
    assert!(html.contains("/files/Big.Release.iso"));
    assert!(html.contains("sync_seedbox: Locked"));
    assert!(!html.contains(r#"role="alert""#));
}

#[tokio::test]
async fn test_french_locale() {
    let app = TestApp::new();
    let html = app.get_localized("/", "fr-FR,fr;q=0.9,en;q=0.8").await.text();
    assert!(html.contains("Tableau de bord"));
    assert!(html.contains(r#"<html lang="fr">"#));

    let html = app.get_localized("/stats", "en-US,en;q=0.9").await.text();
    assert!(html.contains("Statistics"));
}

#[tokio::test]
async fn test_uploaded_paging_and_search() {
    let app = TestApp::new();

    let html = app.get("/uploaded?limit=10&offset=10").await.text();
    assert!(html.contains("Upload_1190.torrent"));
    assert!(!html.contains("Upload_1200.torrent"));
    assert!(html.contains("offset=0&amp;limit=10"));
    assert!(html.contains("offset=20&amp;limit=10"));

    let html = app.get("/uploaded?search=Upload_0042").await.text();
    assert!(html.contains("Upload_0042.torrent"));
    assert!(!html.contains("Upload_0041.torrent"));
}

#[tokio::test]
async fn test_downloaded_lists_in_progress() {
    let app = TestApp::new();
    let html = app.get("/downloaded").await.text();
    assert!(html.contains("/files/unknown-size.bin"));
    assert!(html.contains("/files/Another.Release.iso"));
}

#[tokio::test]
async fn test_info_page() {
    let app = TestApp::new();
    let html = app.get("/info").await.text();

    assert!(html.contains(env!("CARGO_PKG_VERSION")));
    assert!(html.contains("seedboxsync.db"));
    assert!(html.contains("seedboxsync.yml"));
    assert!(html.contains("sync_blackhole: Unlocked"));
    assert!(html.contains("years"));
}

#[tokio::test]
async fn test_unknown_page_is_html_404() {
    let app = TestApp::new();
    let response = app.get("/no/such/page").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.content_type().starts_with("text/html"));
    assert!(response.text().contains("Page not found"));
}

#[tokio::test]
async fn test_missing_database_flashes() {
    let app = TestApp::without_database();
    let response = app.get("/").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.text().contains("Can&#39;t load seedbox database!"));

    let french = app.get_localized("/stats", "fr").await.text();
    assert!(french.contains("Impossible de charger la base de données seedbox !"));
}
