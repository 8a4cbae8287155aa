//! Shared router harness for integration and end-to-end tests

#![allow(dead_code)]

use std::path::PathBuf;

use axum::Router;
use axum::body::Body;
use axum::http::header::{ACCEPT_LANGUAGE, CONTENT_TYPE};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use seedfront_core::FrontConfig;
use seedfront_core::config::{CacheConfig, PathsConfig};
use seedfront_core::test_fixtures::SyncFixture;
use seedfront_web::{AppState, build_router};
use serde_json::Value;
use tower::ServiceExt;

/// Router over a seeded fixture. The fixture lives as long as the app.
pub struct TestApp {
    pub fixture: SyncFixture,
    pub state: AppState,
    router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("response body is UTF-8")
    }

    pub fn content_type(&self) -> &str {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
    }
}

fn front_config(config_file: PathBuf, cache: bool, database: Option<PathBuf>) -> FrontConfig {
    FrontConfig {
        cache: CacheConfig {
            enabled: cache,
            ..CacheConfig::default()
        },
        paths: PathsConfig {
            config_file: Some(config_file),
            database,
        },
        ..FrontConfig::default()
    }
}

impl TestApp {
    /// App with the response cache disabled.
    pub fn new() -> Self {
        let fixture = SyncFixture::new();
        let config = front_config(fixture.config_path.clone(), false, None);
        Self::from_config(fixture, config)
    }

    pub fn with_cache() -> Self {
        let fixture = SyncFixture::new();
        let config = front_config(fixture.config_path.clone(), true, None);
        Self::from_config(fixture, config)
    }

    /// App whose configured database file does not exist.
    pub fn without_database() -> Self {
        let fixture = SyncFixture::new();
        let config = front_config(
            fixture.config_path.clone(),
            false,
            Some(fixture.missing("gone.db")),
        );
        Self::from_config(fixture, config)
    }

    /// App pointed at a YAML file that does not exist, with the database
    /// passed explicitly.
    pub fn without_config() -> Self {
        let fixture = SyncFixture::new();
        let config = front_config(
            fixture.missing("absent.yml"),
            false,
            Some(fixture.db_path.clone()),
        );
        Self::from_config(fixture, config)
    }

    fn from_config(fixture: SyncFixture, config: FrontConfig) -> Self {
        let state = AppState::new(config);
        let router = build_router(state.clone());
        Self {
            fixture,
            state,
            router,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body can be read")
            .to_vec();
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn get_localized(&self, uri: &str, accept_language: &str) -> TestResponse {
        let request = Request::get(uri)
            .header(ACCEPT_LANGUAGE, accept_language)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Posts `fields` as an urlencoded form.
    pub async fn post_form(&self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = fields
            .iter()
            .map(|(name, value)| format!("{name}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");
        let request = Request::post(uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }
}
