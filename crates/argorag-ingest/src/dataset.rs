//! Flattened dataset construction: one row per depth-level sample.

use argorag_core::error::{ArgoragError, Result};
use argorag_core::models::{IndexEntry, MeasurementRecord, RawProfile};
use std::collections::HashMap;
use std::path::Path;

use crate::fetch::MirrorFetcher;
use crate::parse::parse_profile;

/// Result of one dataset build.
pub struct DatasetOutput {
    /// Union of all successfully produced depth-level rows.
    pub records: Vec<MeasurementRecord>,
    /// Parsed depth series per float file, kept for per-profile
    /// persistence after normalization assigns profile ids.
    pub series: HashMap<String, RawProfile>,
    /// Entries fetched and parsed successfully.
    pub processed: usize,
    /// Entries skipped on fetch or parse failure.
    pub skipped: usize,
}

/// Joins per-float index metadata with parsed measurement variables.
pub struct DatasetBuilder<'a> {
    fetcher: &'a MirrorFetcher,
}

impl<'a> DatasetBuilder<'a> {
    pub fn new(fetcher: &'a MirrorFetcher) -> Self {
        Self { fetcher }
    }

    /// Build the flattened dataset for every index entry with a non-empty
    /// file reference. Per-entry fetch and parse failures are logged and
    /// the entry skipped; one bad file never aborts the batch.
    pub async fn build(&self, entries: &[IndexEntry]) -> DatasetOutput {
        let mut output = DatasetOutput {
            records: Vec::new(),
            series: HashMap::new(),
            processed: 0,
            skipped: 0,
        };

        for entry in entries {
            if entry.file.is_empty() {
                tracing::debug!("skipping index entry without file reference");
                continue;
            }

            match self.process_entry(entry).await {
                Ok(profile) => {
                    output.records.extend(explode(entry, &profile));
                    output.series.insert(entry.file.clone(), profile);
                    output.processed += 1;
                }
                Err(error) => {
                    tracing::warn!(file = %entry.file, %error, "skipping profile");
                    output.skipped += 1;
                }
            }
        }

        tracing::info!(
            processed = output.processed,
            skipped = output.skipped,
            rows = output.records.len(),
            "dataset build finished"
        );
        output
    }

    /// Fetch and parse a single index entry.
    pub async fn process_entry(&self, entry: &IndexEntry) -> Result<RawProfile> {
        let path = self.fetcher.fetch(&entry.file).await?;
        parse_profile(&path)
    }
}

/// Zip a parsed profile into per-depth-level records, replicating the
/// float-level metadata onto every sample row.
///
/// An absent salinity variable is substituted with nulls of the pressure
/// sequence's length before zipping, so every row has the same shape. A
/// profile without pressure or temperature produces no rows.
pub fn explode(entry: &IndexEntry, profile: &RawProfile) -> Vec<MeasurementRecord> {
    let Some(pressure) = profile.pressure.values() else {
        return Vec::new();
    };
    let Some(temperature) = profile.temperature.values() else {
        return Vec::new();
    };
    let salinity = profile.salinity.aligned(pressure.len());

    pressure
        .iter()
        .zip(temperature)
        .zip(salinity)
        .map(|((&pres, &temp), psal)| MeasurementRecord {
            float_file: entry.file.clone(),
            date: entry.date,
            latitude: entry.latitude,
            longitude: entry.longitude,
            ocean: entry.ocean.clone(),
            profiler_type: entry.profiler_type.clone(),
            institution: entry.institution.clone(),
            date_update: entry.date_update,
            pressure: pres,
            temperature: Some(temp),
            salinity: psal,
        })
        .collect()
}

/// Persist the flattened dataset as CSV, the durable intermediate
/// artifact between ingestion and normalization.
pub fn write_dataset(records: &[MeasurementRecord], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path).map_err(|e| {
        ArgoragError::Serialization(format!("Failed to create {}: {}", path.display(), e))
    })?;

    for record in records {
        writer.serialize(record).map_err(|e| {
            ArgoragError::Serialization(format!("Failed to write dataset row: {}", e))
        })?;
    }

    writer
        .flush()
        .map_err(|e| ArgoragError::Serialization(format!("Failed to flush dataset: {}", e)))?;

    tracing::info!(rows = records.len(), path = %path.display(), "wrote dataset");
    Ok(())
}

/// Read a previously written flattened dataset back.
pub fn read_dataset(path: &Path) -> Result<Vec<MeasurementRecord>> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| {
        ArgoragError::Serialization(format!("Failed to open {}: {}", path.display(), e))
    })?;

    let mut records = Vec::new();
    for row in reader.deserialize::<MeasurementRecord>() {
        records.push(row.map_err(|e| {
            ArgoragError::Serialization(format!("Failed to read dataset row: {}", e))
        })?);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use argorag_core::models::DepthVariable;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn entry(file: &str) -> IndexEntry {
        IndexEntry {
            file: file.to_string(),
            date: Some(Utc.with_ymd_and_hms(2023, 1, 5, 9, 30, 12).unwrap()),
            date_update: None,
            latitude: Some(-14.5),
            longitude: Some(72.25),
            ocean: Some("I".to_string()),
            profiler_type: Some("846".to_string()),
            institution: Some("AO".to_string()),
        }
    }

    #[test]
    fn test_explode_replicates_metadata() {
        let profile = RawProfile {
            pressure: DepthVariable::Present(vec![5.0, 10.0]),
            temperature: DepthVariable::Present(vec![18.2, 17.9]),
            salinity: DepthVariable::Present(vec![35.1, 35.0]),
        };

        let rows = explode(&entry("a/b.nc"), &profile);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].float_file, "a/b.nc");
        assert_eq!(rows[0].pressure, 5.0);
        assert_eq!(rows[1].salinity, Some(35.0));
        assert_eq!(rows[1].latitude, Some(-14.5));
    }

    #[test]
    fn test_explode_absent_salinity_yields_null_per_row() {
        let profile = RawProfile {
            pressure: DepthVariable::Present(vec![5.0, 10.0, 20.0]),
            temperature: DepthVariable::Present(vec![18.2, 17.9, 16.5]),
            salinity: DepthVariable::Absent,
        };

        let rows = explode(&entry("a/b.nc"), &profile);
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.salinity.is_none()));
    }

    #[test]
    fn test_explode_without_temperature_yields_no_rows() {
        let profile = RawProfile {
            pressure: DepthVariable::Present(vec![5.0]),
            temperature: DepthVariable::Absent,
            salinity: DepthVariable::Absent,
        };

        assert!(explode(&entry("a/b.nc"), &profile).is_empty());
    }

    #[test]
    fn test_dataset_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("processed").join("argo_clean.csv");

        let profile = RawProfile {
            pressure: DepthVariable::Present(vec![5.0, 10.0]),
            temperature: DepthVariable::Present(vec![18.2, 17.9]),
            salinity: DepthVariable::Absent,
        };
        let records = explode(&entry("a/b.nc"), &profile);

        write_dataset(&records, &path).unwrap();
        let read_back = read_dataset(&path).unwrap();

        assert_eq!(read_back.len(), 2);
        assert_eq!(read_back[0].float_file, "a/b.nc");
        assert_eq!(read_back[0].date, records[0].date);
        assert!(read_back[0].salinity.is_none());
        assert_eq!(read_back[1].temperature, Some(17.9));
    }
}
