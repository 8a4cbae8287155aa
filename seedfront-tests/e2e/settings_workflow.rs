//! Editing settings, then reading them back across pages

use axum::http::StatusCode;

use crate::harness::TestApp;

#[tokio::test]
async fn test_toggle_chmod_and_timeout() {
    let app = TestApp::new();
    let mut fields = vec![
        ("seedbox_host", "box.example.org"),
        ("seedbox_port", "22"),
        ("seedbox_login", "me"),
        ("seedbox_password", "p4sw0rd"),
        ("seedbox_timeout_enabled", "on"),
        ("seedbox_timeout", "45"),
        ("seedbox_chmod_enabled", "on"),
        ("seedbox_chmod", "0o640"),
        ("healthchecks_sync_seedbox_enabled", "on"),
        ("healthchecks_sync_seedbox_ping_url", "https://hc.example/ping/abc"),
    ];
    let response = app.post_form("/settings", &fields).await;
    assert_eq!(response.status, StatusCode::OK);

    let yaml = std::fs::read_to_string(&app.fixture.config_path).unwrap();
    assert!(yaml.contains("timeout: 45"));
    assert!(yaml.contains("chmod: 0o640"));
    assert!(yaml.contains("ping_url: https://hc.example/ping/abc"));

    // Unticking both writes `false` back
    fields.retain(|(name, _)| !name.ends_with("_enabled") || name.starts_with("healthchecks"));
    app.post_form("/settings", &fields).await;
    let yaml = std::fs::read_to_string(&app.fixture.config_path).unwrap();
    assert!(yaml.contains("timeout: false"));
    assert!(yaml.contains("chmod: false"));

    let html = app.get("/settings").await.text();
    assert!(html.contains(r#"name="healthchecks_sync_seedbox_enabled" id="healthchecks_sync_seedbox_enabled" value="on" class="w-4 h-4 accent-seed-500" checked"#));
}

#[tokio::test]
async fn test_read_only_file_disables_form() {
    let app = TestApp::without_config();

    let html = app.get("/settings").await.text();
    assert!(html.contains(r#"type="submit" disabled"#));
    assert!(html.contains("No SeedboxSync configuration file found!"));

    let response = app
        .post_form(
            "/settings",
            &[
                ("seedbox_host", "h"),
                ("seedbox_port", "22"),
                ("seedbox_login", "l"),
                ("seedbox_password", "p"),
            ],
        )
        .await;
    assert!(response.text().contains("Configuration file is read-only"));
}
