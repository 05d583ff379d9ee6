//! PostgreSQL storage adapter implementation

pub mod config;
pub mod profiles;
pub mod query;
pub mod vector;

pub use config::{ConfigError, IndexConfig, PoolConfig, PostgresConfig};

use argorag_core::error::{ArgoragError, Result};
use sqlx::{postgres::PgPoolOptions, PgPool};

/// PostgreSQL storage adapter backing both the profile store and the
/// vector collection.
pub struct PostgresStore {
    pool: PgPool,
    config: PostgresConfig,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given configuration
    pub async fn new(config: PostgresConfig) -> Result<Self> {
        config.validate().map_err(|e| ArgoragError::ConfigInvalid {
            key: "database_url".to_string(),
            reason: e.to_string(),
        })?;

        let pool = PgPoolOptions::new()
            .min_connections(config.pool.min_connections)
            .max_connections(config.pool.max_connections)
            .acquire_timeout(config.pool.acquire_timeout)
            .idle_timeout(config.pool.idle_timeout)
            .max_lifetime(config.pool.max_lifetime)
            .connect(&config.database_url)
            .await
            .map_err(|e| ArgoragError::StoreUnavailable {
                reason: format!("Failed to connect to database: {}", e),
            })?;

        // Test connection by executing a simple query
        sqlx::query("SELECT 1").fetch_one(&pool).await.map_err(|e| {
            ArgoragError::StoreUnavailable { reason: format!("Connection test failed: {}", e) }
        })?;

        Ok(Self { pool, config })
    }

    /// Create a new PostgreSQL store and bootstrap the schema
    pub async fn with_schema(config: PostgresConfig) -> Result<Self> {
        let store = Self::new(config).await?;
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Create the profiles table if it does not exist yet.
    ///
    /// The embeddings table is created by `ensure_collection` once the
    /// embedding dimensionality is known.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS profiles (
                profile_id    TEXT PRIMARY KEY,
                float_file    TEXT NOT NULL,
                date_time     TIMESTAMPTZ NOT NULL,
                latitude      DOUBLE PRECISION NOT NULL,
                longitude     DOUBLE PRECISION NOT NULL,
                geom          TEXT NOT NULL,
                ocean         TEXT,
                institution   TEXT,
                profiler_type TEXT,
                summary       TEXT NOT NULL,
                date_update   TIMESTAMPTZ,
                UNIQUE (float_file, date_time)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| ArgoragError::StoreUnavailable {
            reason: format!("Failed to create profiles table: {}", e),
        })?;

        Ok(())
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &PostgresConfig {
        &self.config
    }

    /// Perform a health check on the database connection
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await.map_err(|e| {
            ArgoragError::StoreUnavailable { reason: format!("Health check failed: {}", e) }
        })?;
        Ok(())
    }
}
