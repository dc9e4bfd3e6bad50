use chrono::NaiveDate;

use crate::error::Result;

/// Width of the `YYYYMMDDHHMMSS` launch timestamp encoding.
const LAUNCH_TIMESTAMP_WIDTH: usize = 14;

/// Parse a `YYYY-MM-DD` filter bound.
pub fn parse_date_bound(raw: &str) -> Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")?)
}

/// Parse a launch date stored as `YYYYMMDDHHMMSS`, optionally wrapped in the
/// legacy byte-string form `b'YYYYMMDDHHMMSS'`. Only the date part is kept.
///
/// # Examples
/// ```
/// use argo_query::utils::dates::parse_launch_date;
///
/// let date = parse_launch_date("b'20190515093000'").unwrap();
/// assert_eq!(date.to_string(), "2019-05-15");
/// assert!(parse_launch_date("2019-05-15").is_none());
/// ```
pub fn parse_launch_date(raw: &str) -> Option<NaiveDate> {
    let cleaned = raw
        .strip_prefix("b'")
        .and_then(|s| s.strip_suffix('\''))
        .unwrap_or(raw);

    if cleaned.len() != LAUNCH_TIMESTAMP_WIDTH || !cleaned.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    NaiveDate::parse_from_str(&cleaned[..8], "%Y%m%d").ok()
}
