//! Conditional request module
//!
//! `ETag` / `If-None-Match` and `Last-Modified` / `If-Modified-Since`
//! validators for served files.

use chrono::{DateTime, NaiveDateTime, Utc};
use std::time::SystemTime;

/// IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Generate an `ETag` from file size and modification time
///
/// # Returns
/// Quoted `ETag` string, e.g. `"1a2b-5f3e1c00"`
pub fn generate_etag(len: u64, modified: Option<SystemTime>) -> String {
    let secs = modified.map_or(0, |m| DateTime::<Utc>::from(m).timestamp());
    format!("\"{len:x}-{secs:x}\"")
}

/// Check if client's `If-None-Match` header matches the server's `ETag`
///
/// Supports a single tag, a comma-separated list and the `*` wildcard.
/// Weak comparison is used, so `W/"x"` matches `"x"`.
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etag| {
        client_etag.split(',').map(str::trim).any(|e| {
            e == "*" || e.strip_prefix("W/").unwrap_or(e) == etag
        })
    })
}

/// Format a modification time as an HTTP date
pub fn format_http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format(HTTP_DATE_FORMAT).to_string()
}

/// Parse an HTTP date (IMF-fixdate only)
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value.trim(), HTTP_DATE_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Check if the file is unmodified since the client's `If-Modified-Since`
///
/// Comparison happens at whole-second precision. An unparseable header
/// never matches.
pub fn not_modified_since(if_modified_since: Option<&str>, modified: Option<SystemTime>) -> bool {
    let (Some(header), Some(modified)) = (if_modified_since, modified) else {
        return false;
    };
    let Some(since) = parse_http_date(header) else {
        return false;
    };
    DateTime::<Utc>::from(modified).timestamp() <= since.timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn test_generate_etag() {
        let etag = generate_etag(11, Some(at(784_111_777)));
        assert!(etag.starts_with('"'));
        assert!(etag.ends_with('"'));
        assert_eq!(etag, generate_etag(11, Some(at(784_111_777))));
        assert_ne!(etag, generate_etag(12, Some(at(784_111_777))));
        assert_ne!(etag, generate_etag(11, Some(at(784_111_778))));
    }

    #[test]
    fn test_check_etag_match() {
        let etag = "\"abc123\"";
        assert!(check_etag_match(Some("\"abc123\""), etag));
        assert!(check_etag_match(Some("\"xyz\", \"abc123\""), etag));
        assert!(check_etag_match(Some("W/\"abc123\""), etag));
        assert!(check_etag_match(Some("*"), etag));
        assert!(!check_etag_match(Some("\"different\""), etag));
        assert!(!check_etag_match(None, etag));
    }

    #[test]
    fn test_http_date_roundtrip() {
        let formatted = format_http_date(at(784_111_777));
        assert_eq!(formatted, "Sun, 06 Nov 1994 08:49:37 GMT");
        assert_eq!(
            parse_http_date(&formatted).map(|d| d.timestamp()),
            Some(784_111_777)
        );
        assert!(parse_http_date("yesterday").is_none());
    }

    #[test]
    fn test_not_modified_since() {
        let header = "Sun, 06 Nov 1994 08:49:37 GMT";
        assert!(not_modified_since(Some(header), Some(at(784_111_777))));
        assert!(not_modified_since(Some(header), Some(at(784_111_700))));
        assert!(!not_modified_since(Some(header), Some(at(784_111_800))));
        assert!(!not_modified_since(Some("garbage"), Some(at(0))));
        assert!(!not_modified_since(None, Some(at(0))));
        assert!(!not_modified_since(Some(header), None));
    }
}
