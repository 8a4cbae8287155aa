//! HTTP server for SeedFront
//!
//! Serves the dashboard pages and both JSON APIs from one router.

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use parking_lot::RwLock;
use seedfront_core::config::{ConfigError, FrontConfig, SyncConfig, database_path, locate_config_file};
use seedfront_core::{Database, SettingsDocument};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::cache::ResponseCache;
use crate::errors::{fallback, panic_response};
use crate::handlers::{api_index, downloads, legacy, locks, uploads};
use crate::pages;

/// Problems found at startup that leave the server running in degraded mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupIssue {
    /// No YAML file at any known location
    MissingConfig,
    /// A YAML file exists but could not be parsed
    UnreadableConfig,
    /// The database file does not exist
    MissingDatabase,
}

impl StartupIssue {
    /// English message, translated when rendered.
    pub fn message(self) -> &'static str {
        match self {
            Self::MissingConfig => "No SeedboxSync configuration file found!",
            Self::UnreadableConfig => "Can't read SeedboxSync configuration file!",
            Self::MissingDatabase => "Can't load seedbox database!",
        }
    }
}

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<FrontConfig>,
    pub database: Database,
    /// YAML file the settings page edits, when one was found
    pub settings_path: Option<PathBuf>,
    pub startup_issues: Arc<Vec<StartupIssue>>,
    pub cache: ResponseCache,
    document: Arc<RwLock<Option<SettingsDocument>>>,
}

impl AppState {
    /// Loads the sync configuration and resolves the database.
    ///
    /// Never fails: a missing configuration or database is recorded as a
    /// [`StartupIssue`] and surfaced on every page.
    pub fn new(config: FrontConfig) -> Self {
        let mut issues = Vec::new();
        let explicit_config = config.paths.config_file.as_deref();

        let sync = match SyncConfig::discover(explicit_config) {
            Ok(sync) => Some(sync),
            Err(err @ ConfigError::NotFound { .. }) => {
                tracing::error!("{err}");
                issues.push(StartupIssue::MissingConfig);
                None
            }
            Err(err @ ConfigError::Load { .. }) => {
                tracing::error!("{err}");
                issues.push(StartupIssue::UnreadableConfig);
                None
            }
        };

        let settings_path = sync
            .as_ref()
            .map(|sync| sync.path.clone())
            .or_else(|| locate_config_file(explicit_config))
            .or_else(|| explicit_config.map(PathBuf::from));

        let database = Database::new(database_path(config.paths.database.as_deref(), sync.as_ref()));
        if database.exists() {
            tracing::info!("Using database {}", database.path().display());
        } else {
            tracing::error!("Database {} not found", database.path().display());
            issues.push(StartupIssue::MissingDatabase);
        }

        let cache = if config.cache.enabled {
            ResponseCache::new(config.cache.capacity)
        } else {
            ResponseCache::disabled()
        };

        Self {
            config: Arc::new(config),
            database,
            settings_path,
            startup_issues: Arc::new(issues),
            cache,
            document: Arc::new(RwLock::new(sync.map(|sync| sync.document))),
        }
    }

    /// Snapshot of the YAML configuration currently in memory.
    pub fn document(&self) -> Option<SettingsDocument> {
        self.document.read().clone()
    }

    /// Replaces the in-memory configuration after a save.
    pub fn replace_document(&self, document: SettingsDocument) {
        *self.document.write() = Some(document);
    }

    /// English startup messages to flash on every page.
    pub fn startup_messages(&self) -> Vec<&'static str> {
        self.startup_issues.iter().map(|issue| issue.message()).collect()
    }
}

/// Builds the full router: pages, legacy API, v1 API and middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // HTML pages
        .route("/", get(pages::dashboard_page))
        .route("/homepage", get(pages::dashboard_page))
        .route("/stats", get(pages::stats_page))
        .route("/uploaded", get(pages::uploaded_page))
        .route("/downloaded", get(pages::downloaded_page))
        .route("/info", get(pages::info_page))
        .route(
            "/settings",
            get(pages::settings_page).post(pages::save_settings),
        )
        // Legacy JSON API
        .route("/api", get(legacy::api_root))
        .route("/api/", get(legacy::api_root))
        .route("/api/uploads", get(legacy::uploads))
        .route("/api/uploaded", get(legacy::uploads))
        .route("/api/downloads", get(legacy::downloads))
        .route("/api/downloaded", get(legacy::downloads))
        .route("/api/progress", get(legacy::progress))
        .route("/api/stats-by-month", get(legacy::stats_by_month))
        .route("/api/stats-by-year", get(legacy::stats_by_year))
        // v1 JSON API
        .route("/api/v1", get(api_index))
        .route("/api/v1/", get(api_index))
        .route("/api/v1/downloads", get(downloads::list_downloads))
        .route("/api/v1/downloads/{id}", get(downloads::get_download))
        .route("/api/v1/downloads/stats/{period}", get(downloads::stats_by_period))
        .route("/api/v1/uploads", get(uploads::list_uploads))
        .route(
            "/api/v1/uploads/{id}",
            get(uploads::get_upload).delete(uploads::delete_upload),
        )
        .route("/api/v1/locks", get(locks::list_locks))
        .route("/api/v1/locks/{key}", get(locks::get_lock))
        .fallback(fallback)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds the configured address and serves until the process is stopped.
///
/// # Errors
///
/// - `std::io::Error` - If the address cannot be bound or serving fails
pub async fn run_server(config: FrontConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let address = config.bind_address();
    let state = AppState::new(config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("SeedFront running on http://{address}");
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use seedfront_core::config::{CacheConfig, PathsConfig};
    use seedfront_core::test_fixtures::SyncFixture;
    use tower::ServiceExt;

    use super::*;

    fn config_for(config_file: PathBuf, database: Option<PathBuf>) -> FrontConfig {
        FrontConfig {
            cache: CacheConfig {
                enabled: false,
                ..CacheConfig::default()
            },
            paths: PathsConfig {
                config_file: Some(config_file),
                database,
            },
            ..FrontConfig::default()
        }
    }

    #[test]
    fn test_state_uses_yaml_database() {
        let fixture = SyncFixture::new();
        let state = AppState::new(config_for(fixture.config_path.clone(), None));

        assert!(state.startup_issues.is_empty());
        assert_eq!(state.database.path(), fixture.db_path.as_path());
        assert_eq!(state.settings_path.as_deref(), Some(fixture.config_path.as_path()));
        assert!(state.document().is_some());
    }

    #[test]
    fn test_degraded_startup_records_issues() {
        let fixture = SyncFixture::new();
        let state = AppState::new(config_for(
            fixture.missing("absent.yml"),
            Some(fixture.missing("absent.db")),
        ));

        assert!(state.startup_issues.contains(&StartupIssue::MissingConfig));
        assert!(state.startup_issues.contains(&StartupIssue::MissingDatabase));
        assert!(
            state
                .startup_messages()
                .contains(&"Can't load seedbox database!")
        );
    }

    #[test]
    fn test_unreadable_yaml_is_reported() {
        let fixture = SyncFixture::new();
        std::fs::write(&fixture.config_path, "- just\n- a list\n").unwrap();
        let state = AppState::new(config_for(
            fixture.config_path.clone(),
            Some(fixture.db_path.clone()),
        ));
        assert_eq!(*state.startup_issues, vec![StartupIssue::UnreadableConfig]);
    }

    #[test]
    fn test_router_serves_api_index() {
        let fixture = SyncFixture::new();
        let app = build_router(AppState::new(config_for(fixture.config_path.clone(), None)));

        let response = tokio_test::block_on(
            app.oneshot(Request::get("/api/v1/").body(Body::empty()).unwrap()),
        )
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
