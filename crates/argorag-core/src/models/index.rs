//! Master index entries: one row per known float file in the GDAC catalog.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the master float index. Source of truth for per-profile
/// metadata; immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Path of the measurement file relative to the mirror root.
    pub file: String,

    /// Acquisition timestamp; `None` when unparsable.
    pub date: Option<DateTime<Utc>>,

    /// Last-update timestamp on the archive; `None` when unparsable.
    pub date_update: Option<DateTime<Utc>>,

    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    /// Single-letter ocean code (A, I, P, S, N).
    pub ocean: Option<String>,

    pub profiler_type: Option<String>,
    pub institution: Option<String>,
}

/// Parse a catalog timestamp, coercing anything unparsable to `None`.
///
/// The GDAC index writes `YYYYMMDDHHMMSS`; re-exports and intermediate
/// datasets use RFC 3339 or `YYYY-MM-DD HH:MM:SS`. All are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y%m%d%H%M%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_gdac_compact_format() {
        let dt = parse_timestamp("20230105093012").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2023, 1, 5));
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (9, 30, 12));
    }

    #[test]
    fn test_parse_rfc3339() {
        let dt = parse_timestamp("2023-01-05T09:30:12Z").unwrap();
        assert_eq!(dt.hour(), 9);
        // Offsets normalize to UTC
        let dt = parse_timestamp("2023-01-05T09:30:12+02:00").unwrap();
        assert_eq!(dt.hour(), 7);
    }

    #[test]
    fn test_parse_space_separated() {
        assert!(parse_timestamp("2023-01-05 09:30:12").is_some());
    }

    #[test]
    fn test_unparsable_coerces_to_none() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("   ").is_none());
        assert!(parse_timestamp("not-a-date").is_none());
        assert!(parse_timestamp("2023-13-45").is_none());
    }
}
