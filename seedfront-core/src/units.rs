//! Human-readable formatting of byte counts and durations.
//!
//! Two byte formatters exist: [`sizeof`] picks the largest binary prefix that
//! keeps the magnitude under 1024, while [`byte_to_gi`] always reports GiB so
//! aggregated totals stay comparable across rows.

use chrono::TimeDelta;

const BINARY_UNITS: [&str; 8] = ["", "Ki", "Mi", "Gi", "Ti", "Pi", "Ei", "Zi"];

const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Formats a byte count with the closest binary prefix and a `B` suffix.
///
/// # Examples
/// ```
/// use seedfront_core::units::sizeof;
///
/// assert_eq!(sizeof(0.0), "0.0B");
/// assert_eq!(sizeof(1536.0), "1.5KiB");
/// ```
pub fn sizeof(num: f64) -> String {
    sizeof_with_suffix(num, "B")
}

/// Same as [`sizeof`] with a caller-chosen suffix.
pub fn sizeof_with_suffix(num: f64, suffix: &str) -> String {
    let mut value = num;
    for unit in BINARY_UNITS {
        if value.abs() < 1024.0 {
            return format!("{value:.1}{unit}{suffix}");
        }
        value /= 1024.0;
    }
    format!("{value:.1}Yi{suffix}")
}

/// Formats a byte count in GiB regardless of magnitude.
///
/// # Examples
/// ```
/// use seedfront_core::units::byte_to_gi;
///
/// assert_eq!(byte_to_gi(1024.0 * 1024.0 * 1024.0), "1.0GiB");
/// ```
pub fn byte_to_gi(bytes: f64) -> String {
    byte_to_gi_with_suffix(bytes, "B")
}

/// Same as [`byte_to_gi`] with a caller-chosen suffix.
pub fn byte_to_gi_with_suffix(bytes: f64, suffix: &str) -> String {
    let gib = bytes / BYTES_PER_GIB;
    format!("{gib:.1}Gi{suffix}")
}

/// Describes a duration in years, months and days, dropping anything smaller.
///
/// A year counts as 365 days and a month as 30 days. Zero-valued units are
/// omitted, except that a duration under one day reads `0 days`.
pub fn precise_days(delta: TimeDelta) -> String {
    let total_days = delta.num_days().max(0);
    let years = total_days / 365;
    let months = (total_days % 365) / 30;
    let days = (total_days % 365) % 30;

    let mut parts = Vec::new();
    if years > 0 {
        parts.push(plural(years, "year"));
    }
    if months > 0 {
        parts.push(plural(months, "month"));
    }
    if days > 0 || parts.is_empty() {
        parts.push(plural(days, "day"));
    }

    match parts.split_last() {
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} and {last}", rest.join(", ")),
        None => String::new(),
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("{count} {unit}")
    } else {
        format!("{count} {unit}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

    #[test]
    fn test_sizeof_zero() {
        assert_eq!(sizeof(0.0), "0.0B");
    }

    #[test]
    fn test_sizeof_walks_units() {
        assert_eq!(sizeof(1023.0), "1023.0B");
        assert_eq!(sizeof(1024.0), "1.0KiB");
        assert_eq!(sizeof(GIB), "1.0GiB");
        assert_eq!(sizeof(1_004_650_906.0), "958.1MiB");
    }

    #[test]
    fn test_sizeof_negative_values_keep_sign() {
        assert_eq!(sizeof(-2048.0), "-2.0KiB");
    }

    #[test]
    fn test_sizeof_falls_back_to_yobi() {
        let yobi = 1024f64.powi(8);
        assert_eq!(sizeof(yobi * 3.0), "3.0YiB");
    }

    #[test]
    fn test_sizeof_custom_suffix() {
        assert_eq!(sizeof_with_suffix(1024.0 * 1024.0, "b"), "1.0Mib");
    }

    #[test]
    fn test_byte_to_gi_fixed_scale() {
        assert_eq!(byte_to_gi(GIB), "1.0GiB");
        assert_eq!(byte_to_gi(0.0), "0.0GiB");
        assert_eq!(byte_to_gi(1024.0 * GIB), "1024.0GiB");
        assert_eq!(byte_to_gi(GIB * 37.08), "37.1GiB");
    }

    #[test]
    fn test_precise_days() {
        assert_eq!(precise_days(TimeDelta::hours(3)), "0 days");
        assert_eq!(precise_days(TimeDelta::days(1)), "1 day");
        assert_eq!(precise_days(TimeDelta::days(40)), "1 month and 10 days");
        assert_eq!(
            precise_days(TimeDelta::days(365 * 2 + 64)),
            "2 years, 2 months and 4 days"
        );
        assert_eq!(precise_days(TimeDelta::days(365)), "1 year");
    }
}
