//! Publication date normalization
//!
//! Article tiles carry a `<time datetime="...">` attribute holding an ISO-8601
//! timestamp. Reports only need the calendar day, so time and offset are
//! dropped. When the attribute is missing or unparseable the tile's visible
//! text ("2 days ago", "Jan 27") is used as-is.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::warn;

/// Offset-carrying layouts tried after RFC 3339
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
];

/// Naive (no offset) layouts, most specific first
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO-8601 timestamp into its calendar date.
///
/// A trailing `Z` is read as `+00:00`. The date is taken as written in the
/// timestamp's own offset, never converted to local time. Surrounding
/// whitespace is not stripped, so a padded value is rejected.
///
/// # Examples
/// ```
/// use newspulse::extract::dates::parse_timestamp;
///
/// let date = parse_timestamp("2025-01-27T14:30:00Z").unwrap();
/// assert_eq!(date.to_string(), "2025-01-27");
/// assert!(parse_timestamp("not-a-date").is_none());
/// ```
pub fn parse_timestamp(raw: &str) -> Option<NaiveDate> {
    // chrono's numeric fields may skip leading spaces; keep the check strict
    if raw.trim() != raw {
        return None;
    }

    let value = match raw.strip_suffix('Z') {
        Some(stripped) => format!("{}+00:00", stripped),
        None => raw.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&value) {
        return Some(dt.date_naive());
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&value, fmt) {
            return Some(dt.date_naive());
        }
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&value, fmt) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(&value, "%Y-%m-%d").ok()
}

/// Resolve the report date for one `<time>` node.
///
/// `machine` is the `datetime` attribute (None or empty when absent),
/// `visible` is the node's rendered text. Never fails: an unparseable
/// attribute logs a warning and falls back to the trimmed visible text.
pub fn normalize_date(machine: Option<&str>, visible: &str) -> String {
    match machine.filter(|raw| !raw.is_empty()) {
        Some(raw) => match parse_timestamp(raw) {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => {
                warn!("Could not parse date from datetime attribute: {}", raw);
                visible.trim().to_string()
            }
        },
        None => visible.trim().to_string(),
    }
}
