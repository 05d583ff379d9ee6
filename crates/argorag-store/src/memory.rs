//! In-memory storage implementations for development and testing.
//!
//! These implementations use `RwLock::unwrap()` intentionally. Lock poisoning
//! only occurs when another thread panicked while holding the lock, which is
//! an unrecoverable state. For production workloads, use the PostgreSQL backend.

use argorag_core::error::{ArgoragError, Result};
use argorag_core::models::{ProfileMetadata, RowMap, SemanticMatch, VectorDocument};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::ports::{ProfileStore, VectorStore};

/// In-memory implementation of ProfileStore.
///
/// Structured SQL execution is not available on this backend; `ask`
/// flows fall back to semantic retrieval.
#[derive(Debug, Clone, Default)]
pub struct MemoryProfileStore {
    profiles: Arc<RwLock<Vec<ProfileMetadata>>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn insert_profiles(&self, profiles: &[ProfileMetadata]) -> Result<u64> {
        let mut stored = self.profiles.write().unwrap();

        // Mirror the relational unique key: reject the whole batch rather
        // than partially insert.
        for profile in profiles {
            if stored.iter().any(|p| p.profile_id == profile.profile_id) {
                return Err(ArgoragError::StoreUnavailable {
                    reason: format!("duplicate profile_id {}", profile.profile_id),
                });
            }
        }

        stored.extend(profiles.iter().cloned());
        Ok(profiles.len() as u64)
    }

    async fn summaries(&self) -> Result<Vec<(String, String)>> {
        let stored = self.profiles.read().unwrap();
        Ok(stored
            .iter()
            .filter(|p| !p.summary.is_empty())
            .map(|p| (p.profile_id.clone(), p.summary.clone()))
            .collect())
    }

    async fn execute_query(&self, _sql: &str) -> Result<Vec<RowMap>> {
        Err(ArgoragError::Execution {
            reason: "structured queries require the PostgreSQL backend".to_string(),
        })
    }

    async fn profile_count(&self) -> Result<u64> {
        Ok(self.profiles.read().unwrap().len() as u64)
    }
}

/// In-memory implementation of VectorStore using exact cosine distance.
#[derive(Debug, Clone, Default)]
pub struct MemoryVectorStore {
    documents: Arc<RwLock<HashMap<String, VectorDocument>>>,
}

impl MemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn ensure_collection(&self, _dimensions: usize) -> Result<()> {
        Ok(())
    }

    async fn upsert(&self, documents: &[VectorDocument]) -> Result<()> {
        let mut stored = self.documents.write().unwrap();
        for document in documents {
            stored.insert(document.profile_id.clone(), document.clone());
        }
        Ok(())
    }

    async fn query(&self, embedding: &[f32], k: usize) -> Result<Vec<SemanticMatch>> {
        let stored = self.documents.read().unwrap();

        let mut matches: Vec<SemanticMatch> = stored
            .values()
            .map(|doc| SemanticMatch {
                profile_id: doc.profile_id.clone(),
                summary: doc.summary.clone(),
                distance: cosine_distance(embedding, &doc.embedding),
            })
            .collect();

        matches.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        matches.truncate(k);
        Ok(matches)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.documents.read().unwrap().len() as u64)
    }
}

fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    1.0 - dot / (norm_a * norm_b)
}
