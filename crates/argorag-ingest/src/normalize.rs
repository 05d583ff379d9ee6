//! Normalization of the flattened dataset into canonical profile
//! metadata: validation, ocean-code mapping, deduplication, summary
//! generation, and profile-id assignment.

use argorag_core::models::{MeasurementRecord, ProfileMetadata};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Result of one normalization run.
pub struct NormalizeOutput {
    /// Deduplicated profile metadata, in input order of first occurrence.
    pub profiles: Vec<ProfileMetadata>,
    /// Rows dropped for missing timestamp, latitude, or longitude.
    pub dropped: usize,
    /// Rows discarded as later duplicates of a (float_file, timestamp) key.
    pub duplicates: usize,
}

/// Map a single-letter ocean code to its full name. Unmapped codes pass
/// through unchanged.
pub fn ocean_name(code: &str) -> String {
    match code {
        "A" => "Atlantic",
        "I" => "Indian",
        "P" => "Pacific",
        "S" => "Southern",
        "N" => "Arctic",
        other => other,
    }
    .to_string()
}

/// Normalize flattened measurement rows into deduplicated profile
/// metadata. Rows with missing required metadata are dropped, not
/// repaired; the first occurrence of each (float_file, timestamp) pair
/// wins.
pub fn normalize(records: &[MeasurementRecord]) -> NormalizeOutput {
    let mut output = NormalizeOutput {
        profiles: Vec::new(),
        dropped: 0,
        duplicates: 0,
    };
    let mut seen: HashSet<(String, i64)> = HashSet::new();

    for record in records {
        let (Some(date_time), Some(latitude), Some(longitude)) =
            (record.date, record.latitude, record.longitude)
        else {
            tracing::debug!(file = %record.float_file, "dropping row with missing metadata");
            output.dropped += 1;
            continue;
        };

        if !seen.insert((record.float_file.clone(), date_time.timestamp_micros())) {
            output.duplicates += 1;
            continue;
        }

        let ocean = record.ocean.as_deref().map(ocean_name);
        let summary = make_summary(
            record.profiler_type.as_deref(),
            record.institution.as_deref(),
            date_time,
            ocean.as_deref(),
            latitude,
            longitude,
            record.date_update,
        );

        // Ordinal position in the deduplicated set; unique within one run.
        let profile_id = format!("{}_{}", file_stem(&record.float_file), output.profiles.len());

        output.profiles.push(ProfileMetadata {
            profile_id,
            float_file: record.float_file.clone(),
            date_time,
            latitude,
            longitude,
            ocean,
            institution: record.institution.clone(),
            profiler_type: record.profiler_type.clone(),
            summary,
            date_update: record.date_update,
        });
    }

    tracing::info!(
        profiles = output.profiles.len(),
        dropped = output.dropped,
        duplicates = output.duplicates,
        "normalization finished"
    );
    output
}

/// Generate the summary text used for semantic matching. A pure function
/// of its inputs: identical fields produce byte-identical output.
pub fn make_summary(
    profiler_type: Option<&str>,
    institution: Option<&str>,
    date_time: DateTime<Utc>,
    ocean: Option<&str>,
    latitude: f64,
    longitude: f64,
    date_update: Option<DateTime<Utc>>,
) -> String {
    let date_update_str = match date_update {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => "unknown".to_string(),
    };

    format!(
        "Profile from float {} deployed by institution {} collected on {} UTC \
         in the {} Ocean at latitude {:.2}\u{b0} and longitude {:.2}\u{b0}. \
         Profiler type: {}. Contains measurements of temperature and salinity. \
         Last updated on {}.",
        profiler_type.unwrap_or("unknown"),
        institution.unwrap_or("unknown"),
        date_time.format("%Y-%m-%d %H:%M:%S"),
        ocean.unwrap_or("unknown"),
        latitude,
        longitude,
        profiler_type.unwrap_or("N/A"),
        date_update_str,
    )
}

/// Base name of the float file with its extension stripped.
fn file_stem(file: &str) -> &str {
    let base = file.rsplit('/').next().unwrap_or(file);
    base.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(file: &str, date: Option<DateTime<Utc>>) -> MeasurementRecord {
        MeasurementRecord {
            float_file: file.to_string(),
            date,
            latitude: Some(-14.505),
            longitude: Some(72.254),
            ocean: Some("I".to_string()),
            profiler_type: Some("846".to_string()),
            institution: Some("AO".to_string()),
            date_update: None,
            pressure: 5.0,
            temperature: Some(18.2),
            salinity: None,
        }
    }

    fn date(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 1, day, 9, 30, 12).unwrap()
    }

    #[test]
    fn test_dedup_first_occurrence_wins() {
        let mut first = record("a/R1_001.nc", Some(date(5)));
        first.pressure = 5.0;
        let mut dup = record("a/R1_001.nc", Some(date(5)));
        dup.pressure = 10.0;
        let other = record("a/R1_002.nc", Some(date(6)));

        let output = normalize(&[first, dup, other]);
        assert_eq!(output.profiles.len(), 2);
        assert_eq!(output.duplicates, 1);
        assert_eq!(output.profiles[0].float_file, "a/R1_001.nc");
    }

    #[test]
    fn test_profile_ids_unique_within_run() {
        let records = vec![
            record("a/R1_001.nc", Some(date(5))),
            record("a/R1_001.nc", Some(date(6))),
            record("a/R1_002.nc", Some(date(7))),
        ];

        let output = normalize(&records);
        let ids: HashSet<_> = output.profiles.iter().map(|p| p.profile_id.clone()).collect();
        assert_eq!(ids.len(), output.profiles.len());
        assert_eq!(output.profiles[0].profile_id, "R1_001_0");
        assert_eq!(output.profiles[1].profile_id, "R1_001_1");
        assert_eq!(output.profiles[2].profile_id, "R1_002_2");
    }

    #[test]
    fn test_rows_missing_required_metadata_are_dropped() {
        let no_date = record("a/R1_001.nc", None);
        let mut no_lat = record("a/R1_002.nc", Some(date(5)));
        no_lat.latitude = None;

        let output = normalize(&[no_date, no_lat]);
        assert!(output.profiles.is_empty());
        assert_eq!(output.dropped, 2);
    }

    #[test]
    fn test_ocean_code_mapping() {
        assert_eq!(ocean_name("A"), "Atlantic");
        assert_eq!(ocean_name("N"), "Arctic");
        // Unrecognized codes pass through unchanged
        assert_eq!(ocean_name("X"), "X");
    }

    #[test]
    fn test_summary_is_deterministic() {
        let a = make_summary(Some("846"), Some("AO"), date(5), Some("Indian"), -14.505, 72.254, None);
        let b = make_summary(Some("846"), Some("AO"), date(5), Some("Indian"), -14.505, 72.254, None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_summary_exact_text() {
        let summary = make_summary(
            Some("846"),
            Some("AO"),
            date(5),
            Some("Indian"),
            -14.51,
            72.25,
            Some(Utc.with_ymd_and_hms(2023, 1, 6, 0, 0, 0).unwrap()),
        );

        assert_eq!(
            summary,
            "Profile from float 846 deployed by institution AO collected on \
             2023-01-05 09:30:12 UTC in the Indian Ocean at latitude -14.51\u{b0} \
             and longitude 72.25\u{b0}. Profiler type: 846. Contains measurements \
             of temperature and salinity. Last updated on 2023-01-06 00:00:00 UTC."
        );
    }

    #[test]
    fn test_summary_unknown_last_update() {
        let summary = make_summary(None, None, date(5), None, 0.0, 0.0, None);
        assert!(summary.contains("float unknown"));
        assert!(summary.contains("institution unknown"));
        assert!(summary.contains("Profiler type: N/A"));
        assert!(summary.ends_with("Last updated on unknown."));
    }
}
