//! Per-profile depth-series persistence as columnar Parquet files.
//!
//! One file per profile_id, written once during ingestion and read back
//! by the retrieval API. Columns are nullable Float64 `PRES`, `TEMP`,
//! `PSAL`.

use argorag_core::error::{ArgoragError, Result};
use argorag_core::models::{DepthLevel, DepthSeries, RawProfile};
use arrow::array::{Array, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File store for per-profile depth series, keyed by profile_id.
pub struct DepthSeriesStore {
    dir: PathBuf,
}

impl DepthSeriesStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, profile_id: &str) -> PathBuf {
        self.dir.join(format!("{}.parquet", profile_id))
    }

    /// Write one profile's depth series. Produced once during ingestion;
    /// files are never mutated afterwards.
    pub fn write(&self, series: &DepthSeries) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(&series.profile_id);

        let schema = Arc::new(Schema::new(vec![
            Field::new("PRES", DataType::Float64, true),
            Field::new("TEMP", DataType::Float64, true),
            Field::new("PSAL", DataType::Float64, true),
        ]));

        let pres: Float64Array = series.levels.iter().map(|l| l.pres).collect();
        let temp: Float64Array = series.levels.iter().map(|l| l.temp).collect();
        let psal: Float64Array = series.levels.iter().map(|l| l.psal).collect();

        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![Arc::new(pres), Arc::new(temp), Arc::new(psal)],
        )
        .map_err(|e| ArgoragError::Serialization(format!("Failed to build batch: {}", e)))?;

        let file = File::create(&path)?;
        let mut writer = ArrowWriter::try_new(file, schema, None)
            .map_err(|e| ArgoragError::Serialization(format!("Failed to open writer: {}", e)))?;
        writer
            .write(&batch)
            .map_err(|e| ArgoragError::Serialization(format!("Failed to write batch: {}", e)))?;
        writer
            .close()
            .map_err(|e| ArgoragError::Serialization(format!("Failed to close writer: {}", e)))?;

        Ok(path)
    }

    /// Read the depth series for a profile, failing with a not-found
    /// signal when no artifact exists for the id.
    pub fn read(&self, profile_id: &str) -> Result<DepthSeries> {
        // Ids come in from URLs; never let one escape the store directory.
        if profile_id.contains('/') || profile_id.contains('\\') || profile_id.contains("..") {
            return Err(ArgoragError::DepthSeriesNotFound {
                profile_id: profile_id.to_string(),
            });
        }

        let path = self.path_for(profile_id);
        if !path.exists() {
            return Err(ArgoragError::DepthSeriesNotFound {
                profile_id: profile_id.to_string(),
            });
        }

        let file = File::open(&path)?;
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)
            .map_err(|e| parse_error(&path, e))?
            .build()
            .map_err(|e| parse_error(&path, e))?;

        let mut levels = Vec::new();
        for batch in reader {
            let batch = batch.map_err(|e| parse_error(&path, e))?;
            let pres = column(&batch, &path, "PRES")?;
            let temp = column(&batch, &path, "TEMP")?;
            let psal = column(&batch, &path, "PSAL")?;

            for row in 0..batch.num_rows() {
                levels.push(DepthLevel {
                    pres: value_at(pres, row),
                    temp: value_at(temp, row),
                    psal: value_at(psal, row),
                });
            }
        }

        Ok(DepthSeries {
            profile_id: profile_id.to_string(),
            levels,
        })
    }
}

/// Assemble a depth series from a parsed profile, aligning every
/// variable to the pressure sequence's length.
pub fn series_from_profile(profile_id: &str, profile: &RawProfile) -> DepthSeries {
    let len = profile
        .pressure
        .values()
        .map(|v| v.len())
        .or_else(|| profile.temperature.values().map(|v| v.len()))
        .unwrap_or(0);

    let pres = profile.pressure.aligned(len);
    let temp = profile.temperature.aligned(len);
    let psal = profile.salinity.aligned(len);

    let levels = (0..len)
        .map(|i| DepthLevel {
            pres: pres.get(i).copied().flatten(),
            temp: temp.get(i).copied().flatten(),
            psal: psal.get(i).copied().flatten(),
        })
        .collect();

    DepthSeries {
        profile_id: profile_id.to_string(),
        levels,
    }
}

fn parse_error(path: &Path, error: impl std::fmt::Display) -> ArgoragError {
    ArgoragError::Parse {
        path: path.to_path_buf(),
        reason: error.to_string(),
    }
}

fn column<'a>(batch: &'a RecordBatch, path: &Path, name: &str) -> Result<&'a Float64Array> {
    let index = batch.schema().index_of(name).map_err(|e| parse_error(path, e))?;
    batch
        .column(index)
        .as_any()
        .downcast_ref::<Float64Array>()
        .ok_or_else(|| parse_error(path, format!("column {} is not Float64", name)))
}

fn value_at(array: &Float64Array, row: usize) -> Option<f64> {
    if array.is_null(row) {
        None
    } else {
        Some(array.value(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argorag_core::models::DepthVariable;
    use tempfile::TempDir;

    #[test]
    fn test_roundtrip_with_absent_salinity() {
        let dir = TempDir::new().unwrap();
        let store = DepthSeriesStore::new(dir.path());

        let profile = RawProfile {
            pressure: DepthVariable::Present(vec![5.0, 10.0, 20.0]),
            temperature: DepthVariable::Present(vec![18.2, 17.9, 16.5]),
            salinity: DepthVariable::Absent,
        };
        let series = series_from_profile("R1_001_0", &profile);
        store.write(&series).unwrap();

        let read_back = store.read("R1_001_0").unwrap();
        assert_eq!(read_back.levels.len(), 3);
        assert_eq!(read_back.levels[0].pres, Some(5.0));
        assert_eq!(read_back.levels[2].temp, Some(16.5));
        assert!(read_back.levels.iter().all(|l| l.psal.is_none()));
    }

    #[test]
    fn test_unknown_profile_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = DepthSeriesStore::new(dir.path());

        let err = store.read("nope_0").unwrap_err();
        assert!(matches!(err, ArgoragError::DepthSeriesNotFound { .. }));
    }

    #[test]
    fn test_path_escape_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = DepthSeriesStore::new(dir.path());

        let err = store.read("../../etc/passwd").unwrap_err();
        assert!(matches!(err, ArgoragError::DepthSeriesNotFound { .. }));
    }

    #[test]
    fn test_empty_series_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = DepthSeriesStore::new(dir.path());

        let series = DepthSeries {
            profile_id: "empty_0".to_string(),
            levels: Vec::new(),
        };
        store.write(&series).unwrap();
        assert!(store.read("empty_0").unwrap().levels.is_empty());
    }
}
