//! Statistics page: totals plus month and year buckets

use axum::extract::State;
use axum::http::Uri;
use axum::response::{Html, Response};
use seedfront_core::db::{Connection, DbError, DownloadTotals, queries};
use seedfront_core::{Period, PeriodStat};

use super::{cached_page, page_query, render_page, startup_flashes};
use crate::cache::LISTING_PAGE_TTL;
use crate::components::{escape, layout, stats, tables};
use crate::errors::PageError;
use crate::i18n::Locale;
use crate::server::AppState;

#[derive(Debug, Default)]
struct StatsData {
    totals: DownloadTotals,
    by_month: Vec<PeriodStat>,
    by_year: Vec<PeriodStat>,
}

fn load(conn: &Connection) -> Result<StatsData, DbError> {
    Ok(StatsData {
        totals: queries::download_totals(conn)?,
        by_month: queries::period_stats(conn, Period::Month)?,
        by_year: queries::period_stats(conn, Period::Year)?,
    })
}

fn period_table(header: &'static str, buckets: &[PeriodStat], locale: Locale) -> String {
    let rows: Vec<Vec<String>> = buckets
        .iter()
        .map(|b| vec![escape(&b.key), b.files.to_string(), escape(&b.total_size)])
        .collect();
    tables::data_table(&[header, "Files", "Size"], &rows, locale)
}

async fn render(state: AppState, locale: Locale) -> Result<Html<String>, PageError> {
    let data = page_query(&state, locale, load).await?;

    let content = format!(
        "{}{}{}",
        layout::page_header(locale.tr("Statistics"), None),
        stats::stats_grid(&[
            stats::stat_card(&data.totals.files.to_string(), locale.tr("Total files"), None),
            stats::stat_card(&data.totals.total_size_human, locale.tr("Total size"), None),
        ]),
        layout::grid(
            "grid-cols-1 lg:grid-cols-2",
            &format!(
                "{}{}",
                layout::card(
                    Some(locale.tr("By month")),
                    &period_table("Month", &data.by_month, locale)
                ),
                layout::card(
                    Some(locale.tr("By year")),
                    &period_table("Year", &data.by_year, locale)
                ),
            )
        ),
    );

    Ok(render_page(
        locale.tr("Statistics"),
        "stats",
        locale,
        &startup_flashes(&state, locale),
        &content,
    ))
}

/// `GET /stats`
pub async fn stats_page(State(state): State<AppState>, locale: Locale, uri: Uri) -> Response {
    let page_state = state.clone();
    cached_page(&state, &uri, locale, LISTING_PAGE_TTL, || render(page_state, locale)).await
}
