use argorag_core::error::Result;
use argorag_core::models::{ProfileMetadata, RowMap, SemanticMatch, VectorDocument};
use async_trait::async_trait;

/// Port for the relational profile store.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Bulk-persist normalized profile metadata in one atomic load.
    /// Returns the number of rows written. The store is append-only:
    /// rows are never mutated after insert.
    async fn insert_profiles(&self, profiles: &[ProfileMetadata]) -> Result<u64>;

    /// All (profile_id, summary) pairs with a non-null summary.
    async fn summaries(&self) -> Result<Vec<(String, String)>>;

    /// Execute a read-only structured query and materialize every result
    /// row as a column-name to value mapping.
    async fn execute_query(&self, sql: &str) -> Result<Vec<RowMap>>;

    /// Number of stored profiles.
    async fn profile_count(&self) -> Result<u64>;
}

/// Port for the persistent semantic index over profile summaries.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create the collection if it does not exist yet.
    async fn ensure_collection(&self, dimensions: usize) -> Result<()>;

    /// Insert or overwrite documents keyed by profile_id. Re-upserting
    /// the same id never duplicates an entry.
    async fn upsert(&self, documents: &[VectorDocument]) -> Result<()>;

    /// Top-k nearest neighbors of the query embedding, closest first.
    async fn query(&self, embedding: &[f32], k: usize) -> Result<Vec<SemanticMatch>>;

    /// Number of documents in the collection.
    async fn count(&self) -> Result<u64>;
}
