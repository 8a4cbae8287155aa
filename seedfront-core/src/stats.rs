//! Download statistics grouped by month or year.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::units::byte_to_gi;

/// Granularity of a statistics bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    /// `YYYY-MM` buckets
    Month,
    /// `YYYY` buckets
    Year,
}

impl Period {
    /// `strftime` pattern that truncates a timestamp to this period.
    pub fn strftime_format(self) -> &'static str {
        match self {
            Self::Month => "%Y-%m",
            Self::Year => "%Y",
        }
    }

    /// Field name the bucket key is serialized under.
    pub fn field_name(self) -> &'static str {
        match self {
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            _ => Err(format!(
                "Invalid period: '{s}'. Valid options are: month, year"
            )),
        }
    }
}

/// One aggregated bucket.
///
/// Serializes as `{"<month|year>": key, "files": n, "total_size": "x.yGiB"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodStat {
    pub period: Period,
    pub key: String,
    pub files: u64,
    pub total_size: String,
}

impl Serialize for PeriodStat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry(self.period.field_name(), &self.key)?;
        map.serialize_entry("files", &self.files)?;
        map.serialize_entry("total_size", &self.total_size)?;
        map.end()
    }
}

/// Groups `(key, size)` pairs into buckets ordered by ascending key.
///
/// Pairs with an empty or missing key, or a zero or missing size, are dropped
/// without error. Keys are `YYYY` or `YYYY-MM`, so string order is
/// chronological order.
pub fn aggregate<I>(period: Period, rows: I) -> Vec<PeriodStat>
where
    I: IntoIterator<Item = (Option<String>, Option<i64>)>,
{
    let mut buckets: BTreeMap<String, (u64, f64)> = BTreeMap::new();

    for (key, size) in rows {
        let Some(key) = key.filter(|k| !k.is_empty()) else {
            continue;
        };
        let Some(size) = size.filter(|&s| s != 0) else {
            continue;
        };
        let bucket = buckets.entry(key).or_insert((0, 0.0));
        bucket.0 += 1;
        bucket.1 += size as f64;
    }

    buckets
        .into_iter()
        .map(|(key, (files, total))| PeriodStat {
            period,
            key,
            files,
            total_size: byte_to_gi(total),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const GIB: i64 = 1024 * 1024 * 1024;

    fn row(key: &str, size: i64) -> (Option<String>, Option<i64>) {
        (Some(key.to_string()), Some(size))
    }

    #[test]
    fn test_aggregate_groups_and_sorts() {
        let rows = vec![
            row("2021-03", GIB),
            row("2020-12", 2 * GIB),
            row("2021-03", GIB / 2),
            row("2020-01", GIB),
        ];
        let stats = aggregate(Period::Month, rows);

        let keys: Vec<&str> = stats.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["2020-01", "2020-12", "2021-03"]);
        assert_eq!(stats[2].files, 2);
        assert_eq!(stats[2].total_size, "1.5GiB");
    }

    #[test]
    fn test_aggregate_skips_falsy_rows() {
        let rows = vec![
            (None, Some(GIB)),
            (Some(String::new()), Some(GIB)),
            row("2022", 0),
            (Some("2022".to_string()), None),
            row("2022", GIB),
        ];
        let stats = aggregate(Period::Year, rows);

        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].files, 1);
        assert_eq!(stats[0].total_size, "1.0GiB");
    }

    #[test]
    fn test_period_stat_serializes_period_field() {
        let stat = PeriodStat {
            period: Period::Year,
            key: "2021".to_string(),
            files: 143,
            total_size: "308.3GiB".to_string(),
        };
        let value = serde_json::to_value(&stat).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"year": "2021", "files": 143, "total_size": "308.3GiB"})
        );
    }

    #[test]
    fn test_period_from_str() {
        assert_eq!("Month".parse::<Period>().unwrap(), Period::Month);
        assert_eq!("year".parse::<Period>().unwrap(), Period::Year);
        assert!("week".parse::<Period>().is_err());
    }

    fn arb_row() -> impl Strategy<Value = (Option<String>, Option<i64>)> {
        (
            proptest::option::of((2015u32..2026, 1u32..13).prop_map(|(y, m)| format!("{y}-{m:02}"))),
            proptest::option::of(0i64..(4 * GIB)),
        )
    }

    proptest! {
        #[test]
        fn prop_keys_strictly_ascending(rows in proptest::collection::vec(arb_row(), 0..200)) {
            let stats = aggregate(Period::Month, rows);
            for pair in stats.windows(2) {
                prop_assert!(pair[0].key < pair[1].key);
            }
        }

        #[test]
        fn prop_only_truthy_rows_counted(rows in proptest::collection::vec(arb_row(), 0..200)) {
            let expected = rows
                .iter()
                .filter(|(key, size)| key.is_some() && size.is_some_and(|s| s != 0))
                .count() as u64;
            let stats = aggregate(Period::Month, rows);
            prop_assert_eq!(stats.iter().map(|s| s.files).sum::<u64>(), expected);
        }
    }
}
