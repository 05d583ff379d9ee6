//! Domain models for the ingestion and retrieval pipeline.

pub mod index;
pub mod profile;
pub mod query;

pub use index::{parse_timestamp, IndexEntry};
pub use profile::{
    DepthLevel, DepthSeries, DepthVariable, MeasurementRecord, ProfileMetadata, RawProfile,
};
pub use query::{RowMap, SemanticMatch, VectorDocument};
