//! PostgreSQL configuration

use std::time::Duration;
use thiserror::Error;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {0}")]
    Missing(String),

    #[error("Invalid configuration value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

/// PostgreSQL connection and behavior configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Connection pool configuration
    pub pool: PoolConfig,
    /// Vector index configuration
    pub indexes: IndexConfig,
}

impl PostgresConfig {
    /// Load configuration from environment variables
    ///
    /// Requires DATABASE_URL environment variable to be set.
    /// Other settings use defaults if not specified.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| ConfigError::Missing("DATABASE_URL".to_string()))?;
        Self::new(database_url)
    }

    /// Create a new configuration with the given database URL
    pub fn new(database_url: String) -> Result<Self, ConfigError> {
        if database_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "database_url".to_string(),
                reason: "cannot be empty".to_string(),
            });
        }

        Ok(Self {
            database_url,
            pool: PoolConfig::default(),
            indexes: IndexConfig::default(),
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "database_url".to_string(),
                reason: "cannot be empty".to_string(),
            });
        }

        self.pool.validate()?;

        Ok(())
    }
}

/// Connection pool configuration
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Maximum number of connections allowed
    pub max_connections: u32,
    /// Timeout for acquiring a connection from the pool
    pub acquire_timeout: Duration,
    /// Timeout for idle connections before they are closed
    pub idle_timeout: Duration,
    /// Maximum lifetime of a connection
    pub max_lifetime: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            min_connections: 2,
            max_connections: 10,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(1800),
        }
    }
}

impl PoolConfig {
    /// Validate pool configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_connections > self.max_connections {
            return Err(ConfigError::Invalid {
                key: "pool.min_connections".to_string(),
                reason: format!(
                    "min_connections ({}) cannot be greater than max_connections ({})",
                    self.min_connections, self.max_connections
                ),
            });
        }

        if self.max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "pool.max_connections".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

/// Vector index configuration
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Number of lists for IVFFlat index (None = auto-calculate)
    pub ivfflat_lists: Option<usize>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self { ivfflat_lists: None }
    }
}
