//! VectorStore implementation for PostgreSQL with pgvector.

use argorag_core::error::{ArgoragError, Result};
use argorag_core::models::{SemanticMatch, VectorDocument};
use async_trait::async_trait;
use sqlx::Row;

use super::PostgresStore;
use crate::ports::VectorStore;

impl PostgresStore {
    /// Create an IVFFlat index on the embeddings table.
    /// Lists parameter is auto-calculated if not provided in config.
    pub async fn create_vector_index(&self) -> Result<()> {
        if self.vector_index_exists().await? {
            return Ok(());
        }

        let lists = if let Some(lists) = self.config().indexes.ivfflat_lists {
            lists
        } else {
            // Auto-calculate: sqrt(row_count) is a common heuristic
            let row_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profile_embeddings")
                .fetch_one(self.pool())
                .await
                .map_err(|e| ArgoragError::StoreUnavailable {
                    reason: format!("Failed to count embeddings: {}", e),
                })?;

            let calculated = (row_count as f64).sqrt() as usize;
            calculated.clamp(10, 1000)
        };

        let create_sql = format!(
            "CREATE INDEX IF NOT EXISTS idx_profile_embeddings_vector ON profile_embeddings \
             USING ivfflat(embedding vector_cosine_ops) WITH (lists = {})",
            lists
        );

        sqlx::query(&create_sql).execute(self.pool()).await.map_err(|e| {
            ArgoragError::StoreUnavailable { reason: format!("Failed to create vector index: {}", e) }
        })?;

        Ok(())
    }

    /// Check if the vector index exists
    pub async fn vector_index_exists(&self) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM pg_indexes
                WHERE tablename = 'profile_embeddings'
                AND indexname = 'idx_profile_embeddings_vector'
            )
            "#,
        )
        .fetch_one(self.pool())
        .await
        .map_err(|e| ArgoragError::StoreUnavailable {
            reason: format!("Failed to check index existence: {}", e),
        })?;

        Ok(exists)
    }
}

#[async_trait]
impl VectorStore for PostgresStore {
    async fn ensure_collection(&self, dimensions: usize) -> Result<()> {
        sqlx::query("CREATE EXTENSION IF NOT EXISTS vector")
            .execute(self.pool())
            .await
            .map_err(|e| ArgoragError::StoreUnavailable {
                reason: format!("Failed to enable pgvector extension: {}", e),
            })?;

        let create_table = format!(
            "CREATE TABLE IF NOT EXISTS profile_embeddings (
                profile_id TEXT PRIMARY KEY,
                summary    TEXT NOT NULL,
                embedding  vector({})
            )",
            dimensions
        );

        sqlx::query(&create_table).execute(self.pool()).await.map_err(|e| {
            ArgoragError::StoreUnavailable {
                reason: format!("Failed to create embeddings table: {}", e),
            }
        })?;

        Ok(())
    }

    async fn upsert(&self, documents: &[VectorDocument]) -> Result<()> {
        if documents.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool().begin().await.map_err(|e| ArgoragError::StoreUnavailable {
            reason: format!("Failed to begin transaction: {}", e),
        })?;

        for document in documents {
            sqlx::query(
                r#"
                INSERT INTO profile_embeddings (profile_id, summary, embedding)
                VALUES ($1, $2, $3::vector)
                ON CONFLICT (profile_id) DO UPDATE
                SET summary = EXCLUDED.summary,
                    embedding = EXCLUDED.embedding
                "#,
            )
            .bind(&document.profile_id)
            .bind(&document.summary)
            .bind(vector_literal(&document.embedding))
            .execute(&mut *tx)
            .await
            .map_err(|e| ArgoragError::StoreUnavailable {
                reason: format!("Failed to upsert embedding: {}", e),
            })?;
        }

        tx.commit().await.map_err(|e| ArgoragError::StoreUnavailable {
            reason: format!("Failed to commit transaction: {}", e),
        })?;

        Ok(())
    }

    async fn query(&self, embedding: &[f32], k: usize) -> Result<Vec<SemanticMatch>> {
        let query_str = vector_literal(embedding);

        let rows = sqlx::query(
            r#"
            SELECT
                profile_id,
                summary,
                (embedding <=> $1::vector)::float4 AS distance
            FROM profile_embeddings
            ORDER BY embedding <=> $1::vector
            LIMIT $2
            "#,
        )
        .bind(&query_str)
        .bind(k as i64)
        .fetch_all(self.pool())
        .await
        .map_err(|e| ArgoragError::Execution {
            reason: format!("Similarity search failed: {}", e),
        })?;

        let matches = rows
            .into_iter()
            .map(|row| SemanticMatch {
                profile_id: row.get("profile_id"),
                summary: row.get("summary"),
                distance: row.get("distance"),
            })
            .collect();

        Ok(matches)
    }

    async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profile_embeddings")
            .fetch_one(self.pool())
            .await
            .map_err(|e| ArgoragError::StoreUnavailable {
                reason: format!("Failed to count embeddings: {}", e),
            })?;
        Ok(count as u64)
    }
}

/// Format a vector as a pgvector literal, e.g. "[1,2.5,3]".
fn vector_literal(vector: &[f32]) -> String {
    format!(
        "[{}]",
        vector.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(",")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_literal() {
        assert_eq!(vector_literal(&[1.0, 2.5, 3.0]), "[1,2.5,3]");
        assert_eq!(vector_literal(&[]), "[]");
    }
}
