//! ProfileStore implementation for PostgreSQL

use argorag_core::error::{ArgoragError, Result};
use argorag_core::models::{ProfileMetadata, RowMap};
use async_trait::async_trait;
use sqlx::QueryBuilder;

use super::PostgresStore;
use crate::ports::ProfileStore;

// Postgres caps bind parameters at 65535 per statement; 11 columns per
// row leaves comfortable headroom at this chunk size.
const INSERT_CHUNK_ROWS: usize = 1000;

#[async_trait]
impl ProfileStore for PostgresStore {
    async fn insert_profiles(&self, profiles: &[ProfileMetadata]) -> Result<u64> {
        if profiles.is_empty() {
            return Ok(0);
        }

        // One transaction for the whole load: either every row commits or
        // none do. Connection failures surface before anything is written.
        let mut tx = self.pool().begin().await.map_err(|e| ArgoragError::StoreUnavailable {
            reason: format!("Failed to begin transaction: {}", e),
        })?;

        let mut written = 0u64;
        for chunk in profiles.chunks(INSERT_CHUNK_ROWS) {
            let mut builder = QueryBuilder::new(
                "INSERT INTO profiles (profile_id, float_file, date_time, latitude, longitude, \
                 geom, ocean, institution, profiler_type, summary, date_update) ",
            );

            builder.push_values(chunk, |mut row, profile| {
                row.push_bind(&profile.profile_id)
                    .push_bind(&profile.float_file)
                    .push_bind(profile.date_time)
                    .push_bind(profile.latitude)
                    .push_bind(profile.longitude)
                    .push_bind(profile.geom_wkt())
                    .push_bind(&profile.ocean)
                    .push_bind(&profile.institution)
                    .push_bind(&profile.profiler_type)
                    .push_bind(&profile.summary)
                    .push_bind(profile.date_update);
            });

            let result = builder.build().execute(&mut *tx).await.map_err(|e| {
                ArgoragError::StoreUnavailable { reason: format!("Bulk insert failed: {}", e) }
            })?;
            written += result.rows_affected();
        }

        tx.commit().await.map_err(|e| ArgoragError::StoreUnavailable {
            reason: format!("Failed to commit bulk insert: {}", e),
        })?;

        Ok(written)
    }

    async fn summaries(&self) -> Result<Vec<(String, String)>> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT profile_id, summary FROM profiles WHERE summary IS NOT NULL",
        )
        .fetch_all(self.pool())
        .await
        .map_err(|e| ArgoragError::StoreUnavailable {
            reason: format!("Failed to read summaries: {}", e),
        })?;

        Ok(rows)
    }

    async fn execute_query(&self, sql: &str) -> Result<Vec<RowMap>> {
        super::query::fetch_rows(self.pool(), sql).await
    }

    async fn profile_count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profiles")
            .fetch_one(self.pool())
            .await
            .map_err(|e| ArgoragError::StoreUnavailable {
                reason: format!("Failed to count profiles: {}", e),
            })?;
        Ok(count as u64)
    }
}
