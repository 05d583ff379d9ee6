//! Offline builder for the persistent semantic index over profile
//! summaries.

use argorag_core::error::Result;
use argorag_core::models::VectorDocument;
use argorag_llm::Embedder;
use argorag_store::{ProfileStore, VectorStore};
use std::sync::Arc;

/// Summaries embedded per generation-service call.
const EMBED_BATCH: usize = 64;

/// Outcome of one index build.
#[derive(Debug)]
pub struct IndexReport {
    /// Documents embedded and upserted during this run.
    pub indexed: usize,
    /// Collection cardinality after the run.
    pub total: u64,
}

/// Embeds every stored summary and upserts it into the vector
/// collection. Re-running over an unchanged store is idempotent:
/// existing profile ids are overwritten, never duplicated.
pub struct VectorIndexBuilder {
    profiles: Arc<dyn ProfileStore>,
    vectors: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
}

impl VectorIndexBuilder {
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        vectors: Arc<dyn VectorStore>,
        embedder: Arc<dyn Embedder>,
    ) -> Self {
        Self {
            profiles,
            vectors,
            embedder,
        }
    }

    pub async fn run(&self) -> Result<IndexReport> {
        self.vectors.ensure_collection(self.embedder.dimensions()).await?;

        let summaries = self.profiles.summaries().await?;
        if summaries.is_empty() {
            tracing::warn!("no summaries found in the store to index");
            return Ok(IndexReport {
                indexed: 0,
                total: self.vectors.count().await?,
            });
        }

        let mut indexed = 0;
        for chunk in summaries.chunks(EMBED_BATCH) {
            let texts: Vec<&str> = chunk.iter().map(|(_, summary)| summary.as_str()).collect();
            let embeddings = self.embedder.embed(&texts).await?;

            let documents: Vec<VectorDocument> = chunk
                .iter()
                .zip(embeddings)
                .map(|((profile_id, summary), embedding)| VectorDocument {
                    profile_id: profile_id.clone(),
                    summary: summary.clone(),
                    embedding,
                })
                .collect();

            self.vectors.upsert(&documents).await?;
            indexed += documents.len();
        }

        let total = self.vectors.count().await?;
        tracing::info!(indexed, total, "vector index build finished");

        Ok(IndexReport { indexed, total })
    }
}
