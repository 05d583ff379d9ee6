//! Query execution at the retrieval boundary.
//!
//! The boundary contract is "always returns a value": structured-mode
//! failures fold into a typed error payload instead of propagating to
//! the transport layer.

use argorag_core::error::Result;
use argorag_core::models::{RowMap, SemanticMatch};
use argorag_llm::Embedder;
use argorag_store::{ProfileStore, VectorStore};
use std::sync::Arc;

use crate::guard::check_read_only;

/// Default number of nearest neighbors returned in semantic mode.
pub const DEFAULT_TOP_K: usize = 5;

/// Outcome of a structured retrieval.
#[derive(Debug)]
pub enum RetrievalOutcome {
    /// All result rows, materialized as column-name to value mappings.
    Rows(Vec<RowMap>),
    /// The query failed at the gate or the store; never an exception.
    Failed { error: String },
}

/// Executes translated queries against the relational store and
/// semantic lookups against the vector index.
pub struct HybridRetriever {
    profiles: Arc<dyn ProfileStore>,
    vectors: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    default_k: usize,
}

impl HybridRetriever {
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        vectors: Arc<dyn VectorStore>,
        embedder: Arc<dyn Embedder>,
    ) -> Self {
        Self {
            profiles,
            vectors,
            embedder,
            default_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_default_k(mut self, k: usize) -> Self {
        self.default_k = k;
        self
    }

    /// Structured mode: gate the statement, execute it, and materialize
    /// every row. Failures of any kind return `Failed`, never panic or
    /// propagate.
    pub async fn execute(&self, sql: &str) -> RetrievalOutcome {
        if let Err(error) = check_read_only(sql) {
            tracing::warn!(sql, %error, "query rejected before execution");
            return RetrievalOutcome::Failed {
                error: error.to_string(),
            };
        }

        match self.profiles.execute_query(sql).await {
            Ok(rows) => RetrievalOutcome::Rows(rows),
            Err(error) => {
                tracing::warn!(sql, %error, "query execution failed");
                RetrievalOutcome::Failed {
                    error: error.to_string(),
                }
            }
        }
    }

    /// Semantic mode: embed the raw question and return the top-k
    /// nearest summaries.
    pub async fn semantic(&self, question: &str, k: Option<usize>) -> Result<Vec<SemanticMatch>> {
        let k = k.unwrap_or(self.default_k);

        let mut embeddings = self.embedder.embed(&[question]).await?;
        let embedding = embeddings.pop().unwrap_or_default();

        self.vectors.query(&embedding, k).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argorag_core::error::ArgoragError;
    use argorag_core::models::VectorDocument;
    use argorag_store::memory::{MemoryProfileStore, MemoryVectorStore};
    use async_trait::async_trait;

    /// Embedder mapping known phrases to fixed unit vectors.
    struct KeywordEmbedder;

    #[async_trait]
    impl Embedder for KeywordEmbedder {
        async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
            Ok(texts
                .iter()
                .map(|t| {
                    if t.contains("temperature") {
                        vec![1.0, 0.0]
                    } else {
                        vec![0.0, 1.0]
                    }
                })
                .collect())
        }

        fn dimensions(&self) -> usize {
            2
        }

        fn model_name(&self) -> &str {
            "keyword-test"
        }
    }

    fn retriever(vectors: Arc<MemoryVectorStore>) -> HybridRetriever {
        HybridRetriever::new(Arc::new(MemoryProfileStore::new()), vectors, Arc::new(KeywordEmbedder))
    }

    #[tokio::test]
    async fn test_invalid_query_returns_failed_not_panic() {
        let retriever = retriever(Arc::new(MemoryVectorStore::new()));

        let outcome = retriever.execute("DROP TABLE profiles").await;
        match outcome {
            RetrievalOutcome::Failed { error } => assert!(error.contains("query gate")),
            RetrievalOutcome::Rows(_) => panic!("expected failure"),
        }
    }

    #[tokio::test]
    async fn test_execution_error_returns_failed() {
        // The in-memory backend rejects structured SQL outright
        let retriever = retriever(Arc::new(MemoryVectorStore::new()));

        let outcome = retriever.execute("SELECT * FROM profiles").await;
        assert!(matches!(outcome, RetrievalOutcome::Failed { .. }));
    }

    #[tokio::test]
    async fn test_semantic_mode_returns_nearest_summaries() {
        let vectors = Arc::new(MemoryVectorStore::new());
        vectors
            .upsert(&[
                VectorDocument {
                    profile_id: "warm_0".to_string(),
                    summary: "temperature profile".to_string(),
                    embedding: vec![1.0, 0.0],
                },
                VectorDocument {
                    profile_id: "salty_1".to_string(),
                    summary: "salinity profile".to_string(),
                    embedding: vec![0.0, 1.0],
                },
            ])
            .await
            .unwrap();

        let retriever = retriever(vectors);
        let matches = retriever.semantic("show temperature profiles", Some(1)).await.unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].profile_id, "warm_0");
    }

    #[tokio::test]
    async fn test_semantic_mode_embedder_failure_propagates() {
        struct FailingEmbedder;

        #[async_trait]
        impl Embedder for FailingEmbedder {
            async fn embed(&self, _texts: &[&str]) -> Result<Vec<Vec<f32>>> {
                Err(ArgoragError::EmbedderUnavailable {
                    reason: "down".to_string(),
                    remediation: "start the embedder".to_string(),
                })
            }

            fn dimensions(&self) -> usize {
                2
            }

            fn model_name(&self) -> &str {
                "failing"
            }
        }

        let retriever = HybridRetriever::new(
            Arc::new(MemoryProfileStore::new()),
            Arc::new(MemoryVectorStore::new()),
            Arc::new(FailingEmbedder),
        );

        assert!(retriever.semantic("anything", None).await.is_err());
    }
}
