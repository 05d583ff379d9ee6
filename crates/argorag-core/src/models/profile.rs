//! Profile-level models: parsed depth series, flattened measurement rows,
//! and the canonical per-profile metadata record.

use chrono::{DateTime, Utc};
use geo_types::Point;
use serde::{Deserialize, Serialize};
use wkt::ToWkt;

/// A depth-series variable extracted from a measurement file.
///
/// Absence is explicit rather than an empty sequence: a file that simply
/// does not carry salinity parses to `Absent`, never to an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DepthVariable {
    Present(Vec<f64>),
    Absent,
}

impl DepthVariable {
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    pub fn values(&self) -> Option<&[f64]> {
        match self {
            Self::Present(values) => Some(values),
            Self::Absent => None,
        }
    }

    /// Align this variable with a sequence of the given length: present
    /// values become `Some` per sample, an absent variable becomes all
    /// `None` so every zipped row has the same shape.
    pub fn aligned(&self, len: usize) -> Vec<Option<f64>> {
        match self {
            Self::Present(values) => values.iter().copied().map(Some).collect(),
            Self::Absent => vec![None; len],
        }
    }
}

/// The three fixed variables parsed from one measurement file.
///
/// Invariant: `pressure` and `temperature` are equal length when both
/// present; `salinity`, if present, is aligned with `pressure` by index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawProfile {
    pub pressure: DepthVariable,
    pub temperature: DepthVariable,
    pub salinity: DepthVariable,
}

/// One row per depth-level sample in the flattened intermediate dataset.
/// Float-level metadata is replicated onto every sample row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasurementRecord {
    pub float_file: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(rename = "lat", default)]
    pub latitude: Option<f64>,
    #[serde(rename = "lon", default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub ocean: Option<String>,
    #[serde(default)]
    pub profiler_type: Option<String>,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub date_update: Option<DateTime<Utc>>,
    pub pressure: f64,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub salinity: Option<f64>,
}

/// Canonical metadata for one profile (one (float file, timestamp) pair).
/// Append-only once persisted; unique on `profile_id` and on
/// (`float_file`, `date_time`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileMetadata {
    pub profile_id: String,
    pub float_file: String,
    pub date_time: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    /// Full ocean name when the single-letter code was recognized.
    pub ocean: Option<String>,
    pub institution: Option<String>,
    pub profiler_type: Option<String>,
    /// Generated summary text; the single field used for semantic matching.
    pub summary: String,
    pub date_update: Option<DateTime<Utc>>,
}

impl ProfileMetadata {
    /// Well-known-text point encoding of (longitude, latitude).
    pub fn geom_wkt(&self) -> String {
        Point::new(self.longitude, self.latitude).wkt_string()
    }
}

/// One sample of a stored depth series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthLevel {
    #[serde(rename = "PRES")]
    pub pres: Option<f64>,
    #[serde(rename = "TEMP")]
    pub temp: Option<f64>,
    #[serde(rename = "PSAL")]
    pub psal: Option<f64>,
}

/// The full depth series for one profile, as persisted per profile_id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepthSeries {
    pub profile_id: String,
    pub levels: Vec<DepthLevel>,
}
