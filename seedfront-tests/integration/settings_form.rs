//! Settings page round trip through the YAML file

use axum::http::StatusCode;

use crate::harness::TestApp;

const REQUIRED: [(&str, &str); 4] = [
    ("seedbox_host", "box.example.org"),
    ("seedbox_port", "2222"),
    ("seedbox_login", "alice"),
    ("seedbox_password", "s3cret"),
];

fn with(extra: &[(&'static str, &'static str)]) -> Vec<(&'static str, &'static str)> {
    REQUIRED.iter().chain(extra).copied().collect()
}

#[tokio::test]
async fn test_form_shows_yaml_values() {
    let app = TestApp::new();
    let html = app.get("/settings").await.text();

    assert!(html.contains(r#"value="my-seedbox.ltd""#));
    assert!(html.contains(r#"name="local_db_file""#));
    assert!(!html.contains(r#"type="submit" disabled"#));
}

#[tokio::test]
async fn test_save_writes_octal_chmod() {
    let app = TestApp::new();
    let fields = with(&[("seedbox_chmod_enabled", "on"), ("seedbox_chmod", "755")]);
    let response = app.post_form("/settings", &fields).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.text().contains("Settings saved"));

    let yaml = std::fs::read_to_string(&app.fixture.config_path).unwrap();
    assert!(yaml.contains("chmod: 0o755\n"), "{yaml}");
    assert!(yaml.contains("host: box.example.org"));
    assert!(yaml.contains("port: 2222"));
    assert!(yaml.contains("timeout: false"));
    assert!(yaml.contains("pidfile:"));

    let html = app.get("/settings").await.text();
    assert!(html.contains(r#"value="box.example.org""#));
}

#[tokio::test]
async fn test_partial_post_keeps_unsubmitted_values() {
    let app = TestApp::new();
    let response = app.post_form("/settings", &with(&[])).await;
    assert!(response.text().contains("Settings saved"));

    let yaml = std::fs::read_to_string(&app.fixture.config_path).unwrap();
    assert!(yaml.contains("protocol: sftp"), "{yaml}");
    assert!(yaml.contains("~/Downloads/"), "{yaml}");
    assert!(
        yaml.contains(&format!("db_file: {}", app.fixture.db_path.display())),
        "{yaml}"
    );
    assert!(!yaml.contains("ping_url"), "{yaml}");
}

#[tokio::test]
async fn test_invalid_chmod_leaves_file_untouched() {
    let app = TestApp::new();
    let before = std::fs::read(&app.fixture.config_path).unwrap();

    let fields = with(&[("seedbox_chmod_enabled", "on"), ("seedbox_chmod", "789")]);
    let response = app.post_form("/settings", &fields).await;

    assert_eq!(response.status, StatusCode::OK);
    let html = response.text();
    assert!(html.contains("Invalid chmod value: 789"));
    assert!(html.contains(r#"value="789""#));
    assert_eq!(std::fs::read(&app.fixture.config_path).unwrap(), before);
}

#[tokio::test]
async fn test_missing_fields_are_reported() {
    let app = TestApp::new();
    let response = app
        .post_form("/settings", &[("seedbox_host", "box"), ("seedbox_port", "22")])
        .await;
    assert!(
        response
            .text()
            .contains("Missing required fields: seedbox_login, seedbox_password")
    );
}

#[tokio::test]
async fn test_bad_port_in_french() {
    let app = TestApp::new();
    let body = REQUIRED
        .iter()
        .map(|(name, value)| {
            let value = if *name == "seedbox_port" { "70000" } else { value };
            format!("{name}={}", urlencoding::encode(value))
        })
        .collect::<Vec<_>>()
        .join("&");
    let request = axum::http::Request::post("/settings")
        .header("content-type", "application/x-www-form-urlencoded")
        .header("accept-language", "fr")
        .body(axum::body::Body::from(body))
        .unwrap();

    let html = app.send(request).await.text();
    assert!(html.contains("Le port doit être un nombre entre 0 et 65535"));
}
