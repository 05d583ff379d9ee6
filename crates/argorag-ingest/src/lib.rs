//! Argorag Ingest - the offline pipeline from raw archive files to
//! canonical profile records.
//!
//! Stages, in order: mirror-fallback fetch of measurement files,
//! depth-series variable extraction, flattened dataset construction,
//! normalization into deduplicated profile metadata, and per-profile
//! depth-series persistence.

pub mod catalog;
pub mod dataset;
pub mod depth;
pub mod fetch;
pub mod normalize;
pub mod parse;

pub use dataset::{DatasetBuilder, DatasetOutput};
pub use depth::DepthSeriesStore;
pub use fetch::MirrorFetcher;
pub use normalize::{normalize, NormalizeOutput};
