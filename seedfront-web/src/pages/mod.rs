//! Full HTML pages composed from components
//!
//! Every page shares [`render_page`], which adds the navigation bar and any
//! flash messages. Pages read the database through [`page_query`], which
//! renders empty data when the database file is missing.

pub mod dashboard;
pub mod downloaded;
pub mod error;
pub mod info;
pub mod settings;
pub mod stats;
pub mod uploaded;

use std::future::Future;
use std::time::Duration;

use axum::http::{Method, Uri};
use axum::response::{Html, IntoResponse, Response};
use seedfront_core::db::{Connection, DbError};

pub use dashboard::dashboard_page;
pub use downloaded::downloaded_page;
pub use info::info_page;
pub use settings::{save_settings, settings_page};
pub use stats::stats_page;
pub use uploaded::uploaded_page;

use crate::cache::cache_key;
use crate::components::{Flash, flash_list, layout};
use crate::errors::PageError;
use crate::i18n::Locale;
use crate::server::AppState;

/// Wraps `content` in the base document.
pub fn render_page(
    title: &str,
    active_nav: &str,
    locale: Locale,
    flashes: &[Flash],
    content: &str,
) -> Html<String> {
    let html = format!(
        r#"<!DOCTYPE html>
        <html lang="{}">
        <head>
            <title>{} - SeedFront</title>
            <meta charset="utf-8">
            <meta name="viewport" content="width=device-width, initial-scale=1">
            <script src="https://cdn.tailwindcss.com"></script>
            <script>
                tailwind.config = {{
                    darkMode: 'class',
                    theme: {{
                        extend: {{
                            colors: {{
                                'seed': {{
                                    400: '#5fd08a',
                                    500: '#3cb371',
                                    600: '#2e9a5e'
                                }}
                            }}
                        }}
                    }}
                }}
            </script>
            <style>
                @keyframes pulse-yellow {{
                    0%, 100% {{ opacity: 1; }}
                    50% {{ opacity: 0.5; }}
                }}
                .status-pulse {{ animation: pulse-yellow 2s infinite; }}
            </style>
        </head>
        <body class="bg-gray-900 text-white min-h-screen font-sans">
            {}
            <main class="max-w-7xl mx-auto px-4 py-8">
                <div id="flashes">{}</div>
                {}
            </main>
        </body>
        </html>"#,
        locale.code(),
        title,
        layout::nav_bar(active_nav, locale),
        flash_list(flashes),
        content
    );

    Html(html)
}

/// Startup problems as translated error flashes.
pub fn startup_flashes(state: &AppState, locale: Locale) -> Vec<Flash> {
    state
        .startup_messages()
        .into_iter()
        .map(|message| Flash::error(locale.tr(message)))
        .collect()
}

/// Runs a page query.
///
/// A missing database yields `T::default()` so the page still renders; any
/// other failure becomes the HTML error page.
pub(crate) async fn page_query<T, F>(state: &AppState, locale: Locale, operation: F) -> Result<T, PageError>
where
    T: Default + Send + 'static,
    F: FnOnce(&Connection) -> Result<T, DbError> + Send + 'static,
{
    match state.database.run(operation).await {
        Ok(value) => Ok(value),
        Err(DbError::Missing { path }) => {
            tracing::debug!("Rendering without data, {} is missing", path.display());
            Ok(T::default())
        }
        Err(err) => {
            tracing::error!("Page query failed: {err}");
            Err(PageError::internal(locale))
        }
    }
}

/// Serves a GET page through the response cache.
///
/// Pages are rendered uncached while the database is missing, so they pick up
/// data as soon as it appears.
pub(crate) async fn cached_page<F, Fut>(
    state: &AppState,
    uri: &Uri,
    locale: Locale,
    ttl: Duration,
    render: F,
) -> Response
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Html<String>, PageError>>,
{
    if !state.database.exists() {
        return render().await.into_response();
    }
    let key = cache_key(&Method::GET, uri, locale);
    state
        .cache
        .get_or_render(key, ttl, || async move { render().await.into_response() })
        .await
}
