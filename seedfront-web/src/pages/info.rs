//! Info page: download history, sync locks and where SeedFront reads from

use axum::extract::State;
use axum::http::Uri;
use axum::response::{Html, Response};
use chrono::Local;
use seedfront_core::db::{Connection, DbError, DownloadTotals, Lock, queries};
use seedfront_core::units;

use super::dashboard::lock_status;
use super::{cached_page, page_query, render_page, startup_flashes};
use crate::cache::INFO_TTL;
use crate::components::{escape, layout, stats};
use crate::errors::PageError;
use crate::i18n::Locale;
use crate::server::AppState;

/// Locks the sync tool takes, in display order.
const LOCK_KEYS: [&str; 2] = ["sync_seedbox", "sync_blackhole"];

#[derive(Debug, Default)]
struct InfoData {
    totals: DownloadTotals,
    locks: Vec<Option<Lock>>,
}

fn load(conn: &Connection) -> Result<InfoData, DbError> {
    let locks = LOCK_KEYS
        .iter()
        .map(|key| queries::get_lock(conn, key))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(InfoData {
        totals: queries::download_totals(conn)?,
        locks,
    })
}

fn definition(term: &str, value: &str) -> String {
    format!(
        r#"<div class="flex justify-between py-2 border-b border-gray-700">
            <dt class="text-gray-400">{term}</dt>
            <dd class="text-white font-mono text-sm">{value}</dd>
        </div>"#
    )
}

async fn render(state: AppState, locale: Locale) -> Result<Html<String>, PageError> {
    let data = page_query(&state, locale, load).await?;

    let first_download = data
        .totals
        .first_finished
        .map(|first| {
            let age = units::precise_days(Local::now().naive_local() - first);
            format!(
                "{} ({age} {})",
                first.format("%Y-%m-%d %H:%M"),
                locale.tr("ago")
            )
        })
        .unwrap_or_default();

    let locks: String = LOCK_KEYS
        .iter()
        .enumerate()
        .map(|(i, key)| lock_status(data.locks.get(i).and_then(Option::as_ref), key, locale))
        .collect();

    let config_path = state
        .settings_path
        .as_ref()
        .map(|path| escape(&path.display().to_string()))
        .unwrap_or_default();
    let application = [
        definition(locale.tr("Version"), env!("CARGO_PKG_VERSION")),
        definition(locale.tr("Configuration file"), &config_path),
        definition(
            locale.tr("Database"),
            &escape(&state.database.path().display().to_string()),
        ),
    ]
    .concat();

    let content = format!(
        "{}{}{}{}{}",
        layout::page_header(locale.tr("Info"), None),
        stats::stats_grid(&[
            stats::stat_card(&data.totals.files.to_string(), locale.tr("Total files"), None),
            stats::stat_card(&data.totals.total_size_human, locale.tr("Total size"), None),
        ]),
        layout::card(
            None,
            &format!("<dl>{}</dl>", definition(locale.tr("First download"), &first_download))
        ),
        layout::card(Some(locale.tr("Locks")), &format!(r#"<div class="space-y-2">{locks}</div>"#)),
        layout::card(Some(locale.tr("Application")), &format!("<dl>{application}</dl>")),
    );

    Ok(render_page(
        locale.tr("Info"),
        "info",
        locale,
        &startup_flashes(&state, locale),
        &content,
    ))
}

/// `GET /info`
pub async fn info_page(State(state): State<AppState>, locale: Locale, uri: Uri) -> Response {
    let page_state = state.clone();
    cached_page(&state, &uri, locale, INFO_TTL, || render(page_state, locale)).await
}
