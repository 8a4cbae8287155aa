//! Row types for the tables written by the sync tool.

use chrono::{DateTime, NaiveDateTime, Timelike};
use rusqlite::Row;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ValueRef};

/// A timestamp column as the sync tool stores it.
///
/// The tool writes naive local datetimes as text, and uses the integer `0`
/// (or NULL) to mean "not yet". Text that does not parse is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timestamp {
    /// `0`, `NULL` or empty text
    Unset,
    /// A parsed naive datetime
    At(NaiveDateTime),
    /// Text the parser did not recognise
    Raw(String),
}

const TEXT_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"];

impl Timestamp {
    /// Parses a stored text value.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed == "0" {
            return Self::Unset;
        }
        TEXT_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
            .map(Self::At)
            .unwrap_or_else(|| Self::Raw(trimmed.to_string()))
    }

    /// Returns true when the column holds the "not yet" sentinel.
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// Returns the parsed datetime, if any.
    pub fn datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Self::At(dt) => Some(*dt),
            _ => None,
        }
    }

    /// ISO 8601 without offset, microseconds only when non-zero.
    ///
    /// # Examples
    /// ```
    /// use seedfront_core::db::Timestamp;
    ///
    /// let ts = Timestamp::parse("2017-10-16 21:13:02.851925");
    /// assert_eq!(ts.iso8601().as_deref(), Some("2017-10-16T21:13:02.851925"));
    /// ```
    pub fn iso8601(&self) -> Option<String> {
        match self {
            Self::Unset => None,
            Self::At(dt) => {
                let mut text = dt.format("%Y-%m-%dT%H:%M:%S").to_string();
                let micros = dt.nanosecond() / 1_000;
                if micros != 0 {
                    text.push_str(&format!(".{micros:06}"));
                }
                Some(text)
            }
            Self::Raw(raw) => Some(raw.clone()),
        }
    }

    /// RFC 1123 date as used in HTTP headers.
    pub fn http_date(&self) -> Option<String> {
        match self {
            Self::Unset => None,
            Self::At(dt) => Some(dt.format("%a, %d %b %Y %H:%M:%S GMT").to_string()),
            Self::Raw(raw) => Some(raw.clone()),
        }
    }

    /// Short human form for HTML tables.
    pub fn display(&self) -> String {
        match self {
            Self::Unset => String::new(),
            Self::At(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
            Self::Raw(raw) => raw.clone(),
        }
    }
}

impl FromSql for Timestamp {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Null => Ok(Self::Unset),
            ValueRef::Integer(0) => Ok(Self::Unset),
            ValueRef::Integer(secs) => Ok(DateTime::from_timestamp(secs, 0)
                .map(|dt| Self::At(dt.naive_utc()))
                .unwrap_or_else(|| Self::Raw(secs.to_string()))),
            ValueRef::Real(secs) if secs == 0.0 => Ok(Self::Unset),
            ValueRef::Real(secs) => Ok(DateTime::from_timestamp(secs as i64, 0)
                .map(|dt| Self::At(dt.naive_utc()))
                .unwrap_or_else(|| Self::Raw(secs.to_string()))),
            ValueRef::Text(bytes) => std::str::from_utf8(bytes)
                .map(Self::parse)
                .map_err(|e| FromSqlError::Other(Box::new(e))),
            ValueRef::Blob(_) => Err(FromSqlError::InvalidType),
        }
    }
}

/// A file the sync tool pulled from the seedbox.
#[derive(Debug, Clone, PartialEq)]
pub struct Download {
    pub id: i64,
    pub path: String,
    pub started: Timestamp,
    pub finished: Timestamp,
    pub local_size: Option<i64>,
    pub seedbox_size: Option<i64>,
}

impl Download {
    pub(crate) const COLUMNS: &'static str =
        "id, path, started, finished, local_size, seedbox_size";

    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            path: row.get(1)?,
            started: row.get(2)?,
            finished: row.get(3)?,
            local_size: row.get(4)?,
            seedbox_size: row.get(5)?,
        })
    }

    /// A download is in progress until the tool writes its finish time.
    pub fn is_finished(&self) -> bool {
        !self.finished.is_unset()
    }
}

/// A torrent file the sync tool uploaded to the seedbox.
#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub id: i64,
    pub name: String,
    pub announce: Option<String>,
    pub sent: Timestamp,
}

impl Upload {
    pub(crate) const COLUMNS: &'static str = "id, name, announce, sent";

    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            announce: row.get(2)?,
            sent: row.get(3)?,
        })
    }
}

/// Mutual-exclusion marker the sync tool holds while a job runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Lock {
    pub key: String,
    pub pid: i64,
    pub locked: bool,
    pub locked_at: Timestamp,
    pub unlocked_at: Timestamp,
}

impl Lock {
    pub(crate) const COLUMNS: &'static str = r#""key", pid, locked, locked_at, unlocked_at"#;

    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            key: row.get(0)?,
            pid: row.get::<_, Option<i64>>(1)?.unwrap_or_default(),
            locked: row.get::<_, Option<bool>>(2)?.unwrap_or_default(),
            locked_at: row.get(3)?,
            unlocked_at: row.get(4)?,
        })
    }
}

/// Aggregate figures over finished downloads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DownloadTotals {
    pub files: u64,
    pub total_size: i64,
    /// `total_size` run through the `sizeof` SQL function
    pub total_size_human: String,
    pub first_finished: Option<NaiveDateTime>,
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_parse_text_variants() {
        let expected = NaiveDate::from_ymd_opt(2025, 5, 20)
            .unwrap()
            .and_hms_opt(21, 50, 46)
            .unwrap();
        assert_eq!(Timestamp::parse("2025-05-20 21:50:46"), Timestamp::At(expected));
        assert_eq!(Timestamp::parse("2025-05-20T21:50:46"), Timestamp::At(expected));
        assert_eq!(Timestamp::parse("0"), Timestamp::Unset);
        assert_eq!(Timestamp::parse(""), Timestamp::Unset);
        assert_eq!(
            Timestamp::parse("yesterday"),
            Timestamp::Raw("yesterday".to_string())
        );
    }

    #[test]
    fn test_iso8601_omits_zero_fraction() {
        let ts = Timestamp::parse("2025-05-20 21:50:46");
        assert_eq!(ts.iso8601().as_deref(), Some("2025-05-20T21:50:46"));

        let ts = Timestamp::parse("2017-09-10 19:52:03.455537");
        assert_eq!(ts.iso8601().as_deref(), Some("2017-09-10T19:52:03.455537"));

        let ts = Timestamp::parse("2017-09-10 19:52:03.4");
        assert_eq!(ts.iso8601().as_deref(), Some("2017-09-10T19:52:03.400000"));

        assert_eq!(Timestamp::Unset.iso8601(), None);
    }

    #[test]
    fn test_http_date() {
        let ts = Timestamp::parse("2025-05-20 21:50:46");
        assert_eq!(
            ts.http_date().as_deref(),
            Some("Tue, 20 May 2025 21:50:46 GMT")
        );
    }

    #[test]
    fn test_from_sql_sentinels() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let (zero, null, text): (Timestamp, Timestamp, Timestamp) = conn
            .query_row("SELECT 0, NULL, '2020-01-02 03:04:05'", [], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })
            .unwrap();
        assert!(zero.is_unset());
        assert!(null.is_unset());
        assert_eq!(text.display(), "2020-01-02 03:04");
    }
}
