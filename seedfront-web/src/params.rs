//! Query parameter parsing for list endpoints.
//!
//! Two deliberately different families: the legacy API and the HTML pages
//! fall back to defaults on bad input, the v1 API rejects it.

use std::collections::HashMap;

use seedfront_core::config::parse_bool;

use crate::errors::ApiError;

/// Default row count of the legacy JSON lists.
pub const LEGACY_DEFAULT_LIMIT: u32 = 5;
/// Default row count of the HTML tables.
pub const PAGE_DEFAULT_LIMIT: u32 = 50;
/// Upper bound of every lenient limit.
pub const LENIENT_MAX_LIMIT: u32 = 1000;

/// Default row count of the v1 lists.
pub const STRICT_DEFAULT_LIMIT: u32 = 50;
/// v1 limits are clamped into this range.
pub const STRICT_MIN_LIMIT: u32 = 5;
pub const STRICT_MAX_LIMIT: u32 = 1000;

const LIMIT_HELP: &str = "Maximum number of items to return (min=5, max=1000)";
const OFFSET_HELP: &str =
    "Number of items to skip before starting to collect the result set (default: 0)";
const FINISHED_HELP: &str =
    "Filter only completed downloads (true) or in-progress downloads (false)";

/// Parses `limit`, returning `default` when it is absent, not an integer or
/// outside `1..=max`.
pub fn lenient_limit(raw: Option<&str>, default: u32, max: u32) -> u32 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|limit| (1..=i64::from(max)).contains(limit))
        .map_or(default, |limit| limit as u32)
}

/// Parses `offset` for the HTML tables, returning 0 on bad input.
pub fn lenient_offset(raw: Option<&str>) -> u32 {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .unwrap_or(0)
}

/// Non-empty `search` value.
pub fn search_term(query: &HashMap<String, String>) -> Option<String> {
    query
        .get("search")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Validated parameters of a v1 list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrictListParams {
    pub limit: u32,
    pub offset: u32,
    pub search: Option<String>,
    pub finished: Option<bool>,
}

impl Default for StrictListParams {
    fn default() -> Self {
        Self {
            limit: STRICT_DEFAULT_LIMIT,
            offset: 0,
            search: None,
            finished: None,
        }
    }
}

impl StrictListParams {
    /// Validates a raw query map.
    ///
    /// # Errors
    ///
    /// - `ApiError` (400) - If `limit` or `offset` is not an integer, `offset`
    ///   is negative or `finished` is not a boolean
    pub fn parse(query: &HashMap<String, String>) -> Result<Self, ApiError> {
        let mut params = Self::default();

        if let Some(raw) = query.get("limit") {
            let limit = raw
                .trim()
                .parse::<i64>()
                .map_err(|_| ApiError::invalid_field("limit", LIMIT_HELP))?;
            params.limit = limit.clamp(i64::from(STRICT_MIN_LIMIT), i64::from(STRICT_MAX_LIMIT))
                as u32;
        }

        if let Some(raw) = query.get("offset") {
            params.offset = raw
                .trim()
                .parse::<u32>()
                .map_err(|_| ApiError::invalid_field("offset", OFFSET_HELP))?;
        }

        if let Some(raw) = query.get("finished") {
            // An empty value counts as false
            params.finished = if raw.trim().is_empty() {
                Some(false)
            } else {
                Some(parse_bool(raw).ok_or_else(|| ApiError::invalid_field("finished", FINISHED_HELP))?)
            };
        }

        params.search = search_term(query);
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_lenient_limit_falls_back() {
        assert_eq!(lenient_limit(None, 5, 1000), 5);
        assert_eq!(lenient_limit(Some("20"), 5, 1000), 20);
        assert_eq!(lenient_limit(Some("1000"), 5, 1000), 1000);
        assert_eq!(lenient_limit(Some("1001"), 5, 1000), 5);
        assert_eq!(lenient_limit(Some("0"), 5, 1000), 5);
        assert_eq!(lenient_limit(Some("-3"), 5, 1000), 5);
        assert_eq!(lenient_limit(Some("ten"), 5, 1000), 5);
        assert_eq!(lenient_limit(Some(""), 50, 1000), 50);
    }

    #[test]
    fn test_lenient_offset() {
        assert_eq!(lenient_offset(Some("40")), 40);
        assert_eq!(lenient_offset(Some("-1")), 0);
        assert_eq!(lenient_offset(None), 0);
    }

    #[test]
    fn test_strict_defaults() {
        let params = StrictListParams::parse(&query(&[])).unwrap();
        assert_eq!(params, StrictListParams::default());
        assert_eq!(params.limit, 50);
    }

    #[test]
    fn test_strict_limit_clamped() {
        let params = StrictListParams::parse(&query(&[("limit", "1001")])).unwrap();
        assert_eq!(params.limit, 1000);
        let params = StrictListParams::parse(&query(&[("limit", "1")])).unwrap();
        assert_eq!(params.limit, 5);
        let params = StrictListParams::parse(&query(&[("limit", "-20")])).unwrap();
        assert_eq!(params.limit, 5);
    }

    #[test]
    fn test_strict_rejects_non_integer_limit() {
        let err = StrictListParams::parse(&query(&[("limit", "lots")])).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.errors.unwrap().contains_key("limit"));
    }

    #[test]
    fn test_strict_offset_must_be_non_negative() {
        let err = StrictListParams::parse(&query(&[("offset", "-1")])).unwrap_err();
        assert!(err.errors.unwrap().contains_key("offset"));
        let params = StrictListParams::parse(&query(&[("offset", "100")])).unwrap();
        assert_eq!(params.offset, 100);
    }

    #[test]
    fn test_strict_finished_boolean() {
        let parse = |v: &str| StrictListParams::parse(&query(&[("finished", v)]));
        assert_eq!(parse("true").unwrap().finished, Some(true));
        assert_eq!(parse("No").unwrap().finished, Some(false));
        assert_eq!(parse("").unwrap().finished, Some(false));
        let err = parse("maybe").unwrap_err();
        assert!(err.errors.unwrap().contains_key("finished"));
    }

    #[test]
    fn test_search_trimmed_and_optional() {
        assert_eq!(search_term(&query(&[("search", "  ")])), None);
        assert_eq!(
            search_term(&query(&[("search", " mkv ")])).as_deref(),
            Some("mkv")
        );
    }
}
