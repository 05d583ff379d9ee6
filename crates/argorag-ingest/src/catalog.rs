//! Master index (catalog) loading.
//!
//! The GDAC index is CSV with `#`-prefixed comment lines. Timestamps and
//! coordinates follow coerce semantics: an unparsable value becomes
//! `None`, never an error. A structurally broken row is logged and
//! skipped rather than aborting the load.

use argorag_core::error::{ArgoragError, Result};
use argorag_core::models::{parse_timestamp, IndexEntry};
use serde::Deserialize;
use std::path::Path;

/// One catalog row exactly as it appears on disk.
#[derive(Debug, Deserialize)]
struct RawIndexRow {
    #[serde(default)]
    file: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    latitude: Option<String>,
    #[serde(default)]
    longitude: Option<String>,
    #[serde(default)]
    ocean: Option<String>,
    #[serde(default)]
    profiler_type: Option<String>,
    #[serde(default)]
    institution: Option<String>,
    #[serde(default)]
    date_update: Option<String>,
}

impl RawIndexRow {
    fn into_entry(self) -> IndexEntry {
        IndexEntry {
            file: self.file.unwrap_or_default(),
            date: self.date.as_deref().and_then(parse_timestamp),
            date_update: self.date_update.as_deref().and_then(parse_timestamp),
            latitude: parse_coordinate(self.latitude.as_deref()),
            longitude: parse_coordinate(self.longitude.as_deref()),
            ocean: non_empty(self.ocean),
            profiler_type: non_empty(self.profiler_type),
            institution: non_empty(self.institution),
        }
    }
}

fn parse_coordinate(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Load the master float index from a CSV file.
pub fn load_index(path: &Path) -> Result<Vec<IndexEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| ArgoragError::Serialization(format!(
            "Failed to open index {}: {}",
            path.display(),
            e
        )))?;

    let mut entries = Vec::new();
    for (line, row) in reader.deserialize::<RawIndexRow>().enumerate() {
        match row {
            Ok(raw) => entries.push(raw.into_entry()),
            Err(error) => {
                tracing::warn!(line, %error, "skipping malformed index row");
            }
        }
    }

    tracing::info!(entries = entries.len(), path = %path.display(), "loaded float index");
    Ok(entries)
}
