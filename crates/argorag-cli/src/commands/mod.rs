//! Command implementations

mod ask;
mod index;
mod ingest;
mod load;
mod status;

use crate::cli::{Cli, Commands};
use anyhow::{Context, Result};
use argorag_core::config::AppConfig;
use argorag_store::postgres::{PostgresConfig, PostgresStore};
use std::sync::Arc;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Ingest(args) => ingest::execute(args, &config).await,
        Commands::Load(args) => load::execute(args, &config).await,
        Commands::Index(args) => index::execute(args, &config).await,
        Commands::Ask(args) => ask::execute(args, &config, cli.json).await,
        Commands::Status(args) => status::execute(args, &config, cli.json).await,
    }
}

/// Connect to the configured PostgreSQL backend, bootstrapping the schema.
async fn postgres_store(config: &AppConfig) -> Result<Arc<PostgresStore>> {
    let database_url = config
        .database_url
        .clone()
        .context("DATABASE_URL is not set; this command requires the PostgreSQL backend")?;

    let pg_config = PostgresConfig::new(database_url)?;
    let store = PostgresStore::with_schema(pg_config).await?;
    Ok(Arc::new(store))
}
