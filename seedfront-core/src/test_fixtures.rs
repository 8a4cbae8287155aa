//! Test fixtures for database and settings testing.
//!
//! Builds a sync database with the same tables the sync tool writes, fills it
//! with deterministic sample data and writes a matching YAML file.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use rusqlite::{Connection, params};

/// Finished downloads with a known seedbox size.
pub const SIZED_DOWNLOADS: i64 = 1000;
/// Downloads whose `finished` is not the `0` sentinel.
pub const FINISHED_DOWNLOADS: i64 = SIZED_DOWNLOADS + 1;
/// Downloads still in progress.
pub const IN_PROGRESS_DOWNLOADS: i64 = 2;
/// Rows in the `torrent` table.
pub const UPLOADS: i64 = 1200;

/// Id of the finished download with a NULL seedbox size.
pub const UNSIZED_DOWNLOAD_ID: i64 = SIZED_DOWNLOADS + 1;

const MIB: i64 = 1024 * 1024;

/// Creates the sync tool's tables on `conn`.
///
/// # Errors
///
/// - `rusqlite::Error` - If a statement fails
pub fn create_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS download (
            id INTEGER NOT NULL PRIMARY KEY,
            path VARCHAR(255) NOT NULL,
            seedbox_size INTEGER,
            local_size INTEGER,
            started DATETIME NOT NULL,
            finished DATETIME NOT NULL DEFAULT 0
        );
        CREATE TABLE IF NOT EXISTS torrent (
            id INTEGER NOT NULL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            announce VARCHAR(255),
            sent DATETIME NOT NULL
        );
        CREATE TABLE IF NOT EXISTS "lock" (
            "key" VARCHAR(255) NOT NULL PRIMARY KEY,
            pid INTEGER NOT NULL DEFAULT 0,
            locked INTEGER NOT NULL DEFAULT 0,
            locked_at DATETIME NOT NULL,
            unlocked_at DATETIME
        );
        "#,
    )
}

fn sql_time(at: NaiveDateTime) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn base(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(8, 0, 0))
        .unwrap_or_default()
}

/// Fills the tables with deterministic sample rows.
///
/// - downloads `1..=1000` finished between 2019 and early 2024, sized
/// - download `1001` finished with a NULL seedbox size
/// - downloads `1002` and `1003` in progress
/// - uploads `1..=1200`, every third one with microseconds
/// - locks `sync_blackhole` (released) and `sync_seedbox` (held)
///
/// # Errors
///
/// - `rusqlite::Error` - If an insert fails
pub fn seed_sample_data(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("BEGIN")?;

    let start = base(2019, 1, 1);
    {
        let mut insert = conn.prepare(
            "INSERT INTO download (id, path, started, finished, local_size, seedbox_size)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        for id in 1..=SIZED_DOWNLOADS {
            let started = start + TimeDelta::days(id * 7 / 4) + TimeDelta::minutes(id);
            let finished = started + TimeDelta::minutes(20 + id % 90);
            let size = (id % 50 + 1) * 100 * MIB;
            insert.execute(params![
                id,
                format!("/files/Show.S{:02}E{:02}.mkv", id / 100 + 1, id % 100),
                sql_time(started),
                sql_time(finished),
                size,
                size,
            ])?;
        }

        let late = base(2024, 6, 1);
        insert.execute(params![
            UNSIZED_DOWNLOAD_ID,
            "/files/unknown-size.bin",
            sql_time(late),
            sql_time(late + TimeDelta::hours(1)),
            Option::<i64>::None,
            Option::<i64>::None,
        ])?;

        for (offset, name) in ["/files/Big.Release.iso", "/files/Another.Release.iso"]
            .into_iter()
            .enumerate()
        {
            let id = UNSIZED_DOWNLOAD_ID + 1 + offset as i64;
            insert.execute(params![
                id,
                name,
                sql_time(late + TimeDelta::days(1 + offset as i64)),
                0,
                512 * MIB,
                4096 * MIB,
            ])?;
        }
    }

    {
        let mut insert = conn.prepare(
            "INSERT INTO torrent (id, name, announce, sent) VALUES (?1, ?2, ?3, ?4)",
        )?;
        let start = base(2017, 1, 1);
        for id in 1..=UPLOADS {
            let sent = start + TimeDelta::hours(id * 30);
            let sent = if id % 3 == 0 {
                format!("{}.{:06}", sql_time(sent), 100_000 + id)
            } else {
                sql_time(sent)
            };
            let announce = (id % 5 != 0).then(|| "https://tracker.example/announce".to_string());
            insert.execute(params![id, format!("Upload_{id:04}.torrent"), announce, sent])?;
        }
    }

    conn.execute_batch(
        r#"
        INSERT INTO "lock" ("key", pid, locked, locked_at, unlocked_at) VALUES
            ('sync_blackhole', 0, 0, '2025-10-13 15:37:46.747181', '2025-10-13 15:37:46.752033'),
            ('sync_seedbox', 84074, 1, '2025-10-13 15:38:29.652233', NULL);
        COMMIT;
        "#,
    )
}

/// YAML configuration pointing `local.db_file` at `db_file`.
pub fn sample_yaml(db_file: &Path) -> String {
    format!(
        "seedbox:\n  host: my-seedbox.ltd\n  port: 22\n  login: me\n  password: p4sw0rd\n  \
         timeout: false\n  protocol: sftp\n  chmod: false\n  tmp_path: ./tmp\n  \
         watch_path: ./watch\n  finished_path: ./files\n  prefixed_path: ./files\n  \
         part_suffix: .part\n  exclude_syncing: .*\nlocal:\n  watch_path: ~/watch\n  \
         download_path: ~/Downloads/\n  db_file: {}\npidfile: ~/.seedboxsync/lock/\n",
        db_file.display()
    )
}

/// A temporary directory holding a seeded database and its YAML file.
pub struct SyncFixture {
    pub dir: tempfile::TempDir,
    pub db_path: PathBuf,
    pub config_path: PathBuf,
}

impl SyncFixture {
    /// Creates and seeds the fixture.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory, database or YAML file cannot be
    /// created. This is acceptable in test fixtures where failures indicate
    /// environment issues.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("seedboxsync.db");
        let config_path = dir.path().join("seedboxsync.yml");

        let conn = Connection::open(&db_path).unwrap();
        create_schema(&conn).unwrap();
        seed_sample_data(&conn).unwrap();
        drop(conn);

        std::fs::write(&config_path, sample_yaml(&db_path)).unwrap();

        Self {
            dir,
            db_path,
            config_path,
        }
    }

    /// Path inside the fixture directory that does not exist.
    pub fn missing(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

impl Default for SyncFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_row_counts() {
        let fixture = SyncFixture::new();
        let conn = Connection::open(&fixture.db_path).unwrap();

        let count = |sql: &str| conn.query_row(sql, [], |row| row.get::<_, i64>(0)).unwrap();
        assert_eq!(
            count("SELECT COUNT(*) FROM download WHERE finished != 0"),
            FINISHED_DOWNLOADS
        );
        assert_eq!(
            count("SELECT COUNT(*) FROM download WHERE finished = 0"),
            IN_PROGRESS_DOWNLOADS
        );
        assert_eq!(count("SELECT COUNT(*) FROM torrent"), UPLOADS);
        assert_eq!(count(r#"SELECT COUNT(*) FROM "lock""#), 2);
        assert!(fixture.config_path.is_file());
    }
}
