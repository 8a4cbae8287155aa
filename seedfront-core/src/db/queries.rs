//! Parameterised SQL against the sync tool's tables.
//!
//! Functions take a borrowed connection so callers decide how long it lives;
//! see [`super::Database::run`].

use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};

use super::DbError;
use super::models::{Download, DownloadTotals, Lock, Upload};
use crate::stats::{self, Period, PeriodStat};

/// Selection over the `download` table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadFilter {
    /// `Some(true)` keeps finished rows, `Some(false)` in-progress rows
    pub finished: Option<bool>,
    /// Substring match on `path`
    pub search: Option<String>,
    pub limit: u32,
    pub offset: u32,
}

/// Selection over the `torrent` table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadFilter {
    /// Substring match on `name`
    pub search: Option<String>,
    pub limit: u32,
    pub offset: u32,
}

/// Escapes `%`, `_` and `\` so user text matches literally inside `LIKE`.
fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn download_where(filter: &DownloadFilter) -> (String, Vec<Value>) {
    let mut clauses = Vec::new();
    let mut values = Vec::new();

    match filter.finished {
        Some(true) => clauses.push("finished != 0".to_string()),
        Some(false) => clauses.push("finished = 0".to_string()),
        None => {}
    }
    if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        clauses.push(r"path LIKE ? ESCAPE '\'".to_string());
        values.push(Value::Text(like_pattern(search)));
    }

    if clauses.is_empty() {
        (String::new(), values)
    } else {
        (format!(" WHERE {}", clauses.join(" AND ")), values)
    }
}

fn upload_where(filter: &UploadFilter) -> (String, Vec<Value>) {
    match filter.search.as_deref().filter(|s| !s.is_empty()) {
        Some(search) => (
            r" WHERE name LIKE ? ESCAPE '\'".to_string(),
            vec![Value::Text(like_pattern(search))],
        ),
        None => (String::new(), Vec::new()),
    }
}

/// Lists downloads, most recently finished first.
///
/// # Errors
///
/// - `DbError::Sqlite` - If the query fails
pub fn list_downloads(conn: &Connection, filter: &DownloadFilter) -> Result<Vec<Download>, DbError> {
    let (where_sql, mut values) = download_where(filter);
    let sql = format!(
        "SELECT {} FROM download{where_sql} ORDER BY finished DESC, id DESC LIMIT ? OFFSET ?",
        Download::COLUMNS
    );
    values.push(Value::Integer(i64::from(filter.limit)));
    values.push(Value::Integer(i64::from(filter.offset)));

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values.iter()), Download::from_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Counts downloads matching the filter, ignoring limit and offset.
///
/// # Errors
///
/// - `DbError::Sqlite` - If the query fails
pub fn count_downloads(conn: &Connection, filter: &DownloadFilter) -> Result<u64, DbError> {
    let (where_sql, values) = download_where(filter);
    let sql = format!("SELECT COUNT(*) FROM download{where_sql}");
    let count: i64 = conn.query_row(&sql, params_from_iter(values.iter()), |row| row.get(0))?;
    Ok(count.max(0) as u64)
}

/// Fetches one download by id.
///
/// # Errors
///
/// - `DbError::Sqlite` - If the query fails
pub fn get_download(conn: &Connection, id: i64) -> Result<Option<Download>, DbError> {
    let sql = format!("SELECT {} FROM download WHERE id = ?1", Download::COLUMNS);
    Ok(conn
        .query_row(&sql, params![id], Download::from_row)
        .optional()?)
}

/// Lists uploaded torrents, most recent first.
///
/// # Errors
///
/// - `DbError::Sqlite` - If the query fails
pub fn list_uploads(conn: &Connection, filter: &UploadFilter) -> Result<Vec<Upload>, DbError> {
    let (where_sql, mut values) = upload_where(filter);
    let sql = format!(
        "SELECT {} FROM torrent{where_sql} ORDER BY sent DESC, id DESC LIMIT ? OFFSET ?",
        Upload::COLUMNS
    );
    values.push(Value::Integer(i64::from(filter.limit)));
    values.push(Value::Integer(i64::from(filter.offset)));

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values.iter()), Upload::from_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Counts uploads matching the filter, ignoring limit and offset.
///
/// # Errors
///
/// - `DbError::Sqlite` - If the query fails
pub fn count_uploads(conn: &Connection, filter: &UploadFilter) -> Result<u64, DbError> {
    let (where_sql, values) = upload_where(filter);
    let sql = format!("SELECT COUNT(*) FROM torrent{where_sql}");
    let count: i64 = conn.query_row(&sql, params_from_iter(values.iter()), |row| row.get(0))?;
    Ok(count.max(0) as u64)
}

/// Fetches one upload by id.
///
/// # Errors
///
/// - `DbError::Sqlite` - If the query fails
pub fn get_upload(conn: &Connection, id: i64) -> Result<Option<Upload>, DbError> {
    let sql = format!("SELECT {} FROM torrent WHERE id = ?1", Upload::COLUMNS);
    Ok(conn.query_row(&sql, params![id], Upload::from_row).optional()?)
}

/// Deletes one upload, returning how many rows went away.
///
/// # Errors
///
/// - `DbError::Sqlite` - If the statement fails, e.g. on a read-only file
pub fn delete_upload(conn: &Connection, id: i64) -> Result<usize, DbError> {
    Ok(conn.execute("DELETE FROM torrent WHERE id = ?1", params![id])?)
}

/// Lists every lock ordered by key.
///
/// # Errors
///
/// - `DbError::Sqlite` - If the query fails
pub fn list_locks(conn: &Connection) -> Result<Vec<Lock>, DbError> {
    let sql = format!(r#"SELECT {} FROM "lock" ORDER BY "key""#, Lock::COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], Lock::from_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Fetches one lock by key.
///
/// # Errors
///
/// - `DbError::Sqlite` - If the query fails
pub fn get_lock(conn: &Connection, key: &str) -> Result<Option<Lock>, DbError> {
    let sql = format!(r#"SELECT {} FROM "lock" WHERE "key" = ?1"#, Lock::COLUMNS);
    Ok(conn.query_row(&sql, params![key], Lock::from_row).optional()?)
}

/// Returns `(period key, seedbox size)` for every finished download.
///
/// The key comes from SQLite's `strftime`, so malformed timestamps yield NULL.
///
/// # Errors
///
/// - `DbError::Sqlite` - If the query fails
pub fn period_rows(
    conn: &Connection,
    period: Period,
) -> Result<Vec<(Option<String>, Option<i64>)>, DbError> {
    let mut stmt = conn.prepare(
        "SELECT strftime(?1, finished), seedbox_size FROM download \
         WHERE finished != 0 ORDER BY finished DESC",
    )?;
    let rows = stmt.query_map(params![period.strftime_format()], |row| {
        Ok((row.get(0)?, row.get(1)?))
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Month or year buckets over finished downloads.
///
/// # Errors
///
/// - `DbError::Sqlite` - If the query fails
pub fn period_stats(conn: &Connection, period: Period) -> Result<Vec<PeriodStat>, DbError> {
    Ok(stats::aggregate(period, period_rows(conn, period)?))
}

/// Counts finished downloads and sums their seedbox sizes.
///
/// # Errors
///
/// - `DbError::Sqlite` - If the query fails
pub fn download_totals(conn: &Connection) -> Result<DownloadTotals, DbError> {
    let (files, total_size, total_size_human): (i64, i64, String) = conn.query_row(
        "SELECT COUNT(*), COALESCE(SUM(seedbox_size), 0), sizeof(COALESCE(SUM(seedbox_size), 0)) \
         FROM download WHERE finished != 0",
        [],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
    )?;

    let first_finished: Option<super::Timestamp> = conn
        .query_row(
            "SELECT finished FROM download WHERE finished != 0 ORDER BY finished ASC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    Ok(DownloadTotals {
        files: files.max(0) as u64,
        total_size,
        total_size_human,
        first_finished: first_finished.and_then(|ts| ts.datetime()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::register_functions;

    fn seeded() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        register_functions(&conn).unwrap();
        crate::test_fixtures::create_schema(&conn).unwrap();
        conn.execute_batch(
            r#"
            INSERT INTO download (id, path, started, finished, local_size, seedbox_size) VALUES
                (1, 'Old.mkv',     '2020-01-01 10:00:00', '2020-01-01 11:00:00', 100, 100),
                (2, 'New.mkv',     '2021-03-01 10:00:00', '2021-03-01 11:00:00', 200, 300),
                (3, 'Partial.iso', '2021-03-02 10:00:00', 0, 50, 900),
                (4, '50%_off.txt', '2021-03-03 10:00:00', '2021-03-03 11:00:00', 10, NULL);
            INSERT INTO torrent (id, name, announce, sent) VALUES
                (1, 'Alpha.torrent', 'https://tracker/announce', '2017-09-10 19:52:03.455537'),
                (2, 'Beta.torrent', NULL, '2017-10-16 21:13:02');
            INSERT INTO "lock" ("key", pid, locked, locked_at, unlocked_at) VALUES
                ('sync_seedbox', 84074, 1, '2025-10-13 15:38:29.652233', NULL),
                ('sync_blackhole', 0, 0, '2025-10-13 15:37:46.747181', '2025-10-13 15:37:46.752033');
            "#,
        )
        .unwrap();
        conn
    }

    fn all() -> DownloadFilter {
        DownloadFilter {
            limit: 100,
            ..DownloadFilter::default()
        }
    }

    #[test]
    fn test_list_downloads_finished_first() {
        let conn = seeded();
        let rows = list_downloads(&conn, &all()).unwrap();
        let ids: Vec<i64> = rows.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![4, 2, 1, 3]);
        assert!(!rows[3].is_finished());
    }

    #[test]
    fn test_list_downloads_filters() {
        let conn = seeded();

        let in_progress = DownloadFilter {
            finished: Some(false),
            ..all()
        };
        let rows = list_downloads(&conn, &in_progress).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].path, "Partial.iso");

        let finished = DownloadFilter {
            finished: Some(true),
            limit: 1,
            offset: 1,
            ..DownloadFilter::default()
        };
        let rows = list_downloads(&conn, &finished).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 2);
        assert_eq!(count_downloads(&conn, &finished).unwrap(), 3);
    }

    #[test]
    fn test_search_escapes_like_wildcards() {
        let conn = seeded();
        let filter = DownloadFilter {
            search: Some("50%".to_string()),
            ..all()
        };
        let rows = list_downloads(&conn, &filter).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 4);

        let filter = DownloadFilter {
            search: Some("_".to_string()),
            ..all()
        };
        assert_eq!(count_downloads(&conn, &filter).unwrap(), 1);
    }

    #[test]
    fn test_get_and_delete_upload() {
        let conn = seeded();
        let upload = get_upload(&conn, 1).unwrap().unwrap();
        assert_eq!(upload.name, "Alpha.torrent");
        assert_eq!(upload.announce.as_deref(), Some("https://tracker/announce"));

        assert_eq!(delete_upload(&conn, 1).unwrap(), 1);
        assert_eq!(delete_upload(&conn, 1).unwrap(), 0);
        assert!(get_upload(&conn, 1).unwrap().is_none());
    }

    #[test]
    fn test_upload_search_and_count() {
        let conn = seeded();
        let filter = UploadFilter {
            search: Some("beta".to_string()),
            limit: 10,
            offset: 0,
        };
        let rows = list_uploads(&conn, &filter).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 2);
        assert_eq!(count_uploads(&conn, &UploadFilter::default()).unwrap(), 2);
    }

    #[test]
    fn test_locks() {
        let conn = seeded();
        let locks = list_locks(&conn).unwrap();
        assert_eq!(locks.len(), 2);
        assert_eq!(locks[0].key, "sync_blackhole");
        assert!(!locks[0].locked);

        let seedbox = get_lock(&conn, "sync_seedbox").unwrap().unwrap();
        assert_eq!(seedbox.pid, 84074);
        assert!(seedbox.locked);
        assert!(seedbox.unlocked_at.is_unset());
        assert!(get_lock(&conn, "test").unwrap().is_none());
    }

    #[test]
    fn test_period_rows_and_totals() {
        let conn = seeded();
        let rows = period_rows(&conn, Period::Year).unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.contains(&(Some("2020".to_string()), Some(100))));
        assert!(rows.contains(&(Some("2021".to_string()), None)));

        let totals = download_totals(&conn).unwrap();
        assert_eq!(totals.files, 3);
        assert_eq!(totals.total_size, 400);
        assert_eq!(totals.total_size_human, "400.0B");
        assert_eq!(
            totals.first_finished.map(|dt| dt.to_string()).as_deref(),
            Some("2020-01-01 11:00:00")
        );
    }

    #[test]
    fn test_period_stats_by_month() {
        let conn = seeded();
        let stats = period_stats(&conn, Period::Month).unwrap();
        let keys: Vec<&str> = stats.iter().map(|s| s.key.as_str()).collect();
        // The NULL-sized March row is skipped but the sized one counts
        assert_eq!(keys, vec!["2020-01", "2021-03"]);
        assert_eq!(stats[1].files, 1);
        assert_eq!(stats[1].total_size, "0.0GiB");
    }
}
