//! Dashboard page: totals, latest activity and lock states

use axum::extract::State;
use axum::http::Uri;
use axum::response::{Html, Response};
use seedfront_core::db::{
    Connection, DbError, Download, DownloadFilter, DownloadTotals, Lock, Timestamp, Upload, UploadFilter,
    queries,
};
use seedfront_core::units;

use super::{cached_page, page_query, render_page, startup_flashes};
use crate::cache::DASHBOARD_TTL;
use crate::components::{escape, layout, stats, tables};
use crate::errors::PageError;
use crate::i18n::Locale;
use crate::server::AppState;

/// Rows shown in each "latest" table.
const RECENT_ROWS: u32 = 5;

#[derive(Debug, Default)]
struct DashboardData {
    totals: DownloadTotals,
    downloads: Vec<Download>,
    uploads: Vec<Upload>,
    in_progress: Vec<Download>,
    locks: Vec<Lock>,
}

fn load(conn: &Connection) -> Result<DashboardData, DbError> {
    let recent = |finished| DownloadFilter {
        finished: Some(finished),
        limit: RECENT_ROWS,
        ..DownloadFilter::default()
    };
    Ok(DashboardData {
        totals: queries::download_totals(conn)?,
        downloads: queries::list_downloads(conn, &recent(true))?,
        uploads: queries::list_uploads(
            conn,
            &UploadFilter {
                limit: RECENT_ROWS,
                ..UploadFilter::default()
            },
        )?,
        in_progress: queries::list_downloads(
            conn,
            &DownloadFilter {
                finished: Some(false),
                limit: u32::MAX,
                ..DownloadFilter::default()
            },
        )?,
        locks: queries::list_locks(conn)?,
    })
}

/// Escaped display text of a stored timestamp; unparsed text comes from the
/// database verbatim.
fn timestamp_cell(ts: &Timestamp) -> String {
    escape(&ts.display())
}

/// Table rows for a list of downloads.
pub(crate) fn download_rows(downloads: &[Download], with_finished: bool) -> Vec<Vec<String>> {
    downloads
        .iter()
        .map(|d| {
            let mut row = vec![d.id.to_string(), escape(&d.path)];
            if with_finished {
                row.push(timestamp_cell(&d.finished));
            } else {
                row.push(timestamp_cell(&d.started));
            }
            row.push(
                d.local_size
                    .or(d.seedbox_size)
                    .map(|size| units::sizeof(size as f64))
                    .unwrap_or_default(),
            );
            row
        })
        .collect()
}

/// Table rows for a list of uploads.
pub(crate) fn upload_rows(uploads: &[Upload]) -> Vec<Vec<String>> {
    uploads
        .iter()
        .map(|u| vec![u.id.to_string(), escape(&u.name), timestamp_cell(&u.sent)])
        .collect()
}

/// Status dot for one lock.
pub(crate) fn lock_status(lock: Option<&Lock>, name: &str, locale: Locale) -> String {
    let (status, state) = match lock {
        Some(lock) if lock.locked => ("locked", locale.tr("Locked")),
        Some(_) => ("unlocked", locale.tr("Unlocked")),
        None => ("unknown", locale.tr("Unknown")),
    };
    let since = lock
        .filter(|lock| lock.locked)
        .map(|lock| timestamp_cell(&lock.locked_at))
        .filter(|text| !text.is_empty())
        .map(|text| format!(" ({} {text})", locale.tr("Since")))
        .unwrap_or_default();
    stats::status_indicator(status, &format!("{name}: {state}{since}"))
}

async fn render(state: AppState, locale: Locale) -> Result<Html<String>, PageError> {
    let data = page_query(&state, locale, load).await?;

    let totals = stats::stats_grid(&[
        stats::stat_card(&data.totals.files.to_string(), locale.tr("Total files"), None),
        stats::stat_card(&data.totals.total_size_human, locale.tr("Total size"), None),
    ]);

    let locks: String = data
        .locks
        .iter()
        .map(|lock| lock_status(Some(lock), &escape(&lock.key), locale))
        .collect();

    let latest = layout::grid(
        "grid-cols-1 lg:grid-cols-2",
        &format!(
            "{}{}",
            layout::card(
                Some(locale.tr("Last downloads")),
                &tables::data_table(
                    &["#", "Path", "Finished", "Size"],
                    &download_rows(&data.downloads, true),
                    locale
                )
            ),
            layout::card(
                Some(locale.tr("Last uploads")),
                &tables::data_table(&["#", "Name", "Sent"], &upload_rows(&data.uploads), locale)
            ),
        ),
    );

    let content = format!(
        "{}{totals}{latest}{}{}",
        layout::page_header(locale.tr("Dashboard"), None),
        layout::card(
            Some(locale.tr("In progress")),
            &tables::data_table(
                &["#", "Path", "Started", "Size"],
                &download_rows(&data.in_progress, false),
                locale
            )
        ),
        layout::card(Some(locale.tr("Locks")), &format!(r#"<div class="space-y-2">{locks}</div>"#)),
    );

    Ok(render_page(
        locale.tr("Dashboard"),
        "dashboard",
        locale,
        &startup_flashes(&state, locale),
        &content,
    ))
}

/// `GET /` and `GET /homepage`
pub async fn dashboard_page(State(state): State<AppState>, locale: Locale, uri: Uri) -> Response {
    let page_state = state.clone();
    cached_page(&state, &uri, locale, DASHBOARD_TTL, || render(page_state, locale)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = "<script>alert(1)</script>";

    #[test]
    fn test_unparsed_timestamps_are_escaped() {
        let uploads = [Upload {
            id: 7,
            name: "a&b.torrent".to_string(),
            announce: None,
            sent: Timestamp::parse(SCRIPT),
        }];
        let rows = upload_rows(&uploads);
        assert_eq!(rows[0][1], "a&amp;b.torrent");
        assert_eq!(rows[0][2], "&lt;script&gt;alert(1)&lt;/script&gt;");

        let downloads = [Download {
            id: 1,
            path: "/files/x.mkv".to_string(),
            started: Timestamp::parse(SCRIPT),
            finished: Timestamp::parse("2025-05-20 21:50:46"),
            local_size: Some(1024),
            seedbox_size: None,
        }];
        assert_eq!(download_rows(&downloads, true)[0][2], "2025-05-20 21:50");
        assert!(!download_rows(&downloads, false)[0][2].contains('<'));
    }

    #[test]
    fn test_lock_since_text_is_escaped() {
        let lock = Lock {
            key: "sync_seedbox".to_string(),
            pid: 42,
            locked: true,
            locked_at: Timestamp::parse(SCRIPT),
            unlocked_at: Timestamp::Unset,
        };
        let html = lock_status(Some(&lock), "sync_seedbox", Locale::En);
        assert!(!html.contains(SCRIPT));
        assert!(html.contains("sync_seedbox: Locked (Since &lt;script&gt;"));
        assert!(lock_status(None, "sync_blackhole", Locale::En).contains("Unknown"));
    }
}
