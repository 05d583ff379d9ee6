//! Retrieval-side models shared by the store ports and the query path.

use serde::{Deserialize, Serialize};

/// A result row materialized as a column-name to value mapping.
pub type RowMap = serde_json::Map<String, serde_json::Value>;

/// A profile summary with its embedding, as held by the vector store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorDocument {
    pub profile_id: String,
    pub summary: String,
    pub embedding: Vec<f32>,
}

/// One nearest-neighbor match from the semantic index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticMatch {
    pub profile_id: String,
    pub summary: String,
    /// Cosine distance to the query embedding; smaller is closer.
    pub distance: f32,
}
