use anyhow::Result;
use argorag_core::config::AppConfig;
use argorag_ingest::{dataset, normalize};
use argorag_store::ProfileStore;
use console::style;

use crate::cli::LoadArgs;
use super::postgres_store;

pub async fn execute(args: LoadArgs, config: &AppConfig) -> Result<()> {
    let dataset_path = args.dataset.unwrap_or_else(|| config.ingest.dataset_path.clone());

    let records = dataset::read_dataset(&dataset_path)?;
    let normalized = normalize(&records);

    if normalized.profiles.is_empty() {
        println!("{} no profiles to load", style("Warning:").yellow().bold());
        return Ok(());
    }

    let store = postgres_store(config).await?;
    let written = store.insert_profiles(&normalized.profiles).await?;

    println!(
        "{} {} profiles into PostgreSQL ({} rows dropped, {} duplicates discarded)",
        style("Loaded").green().bold(),
        written,
        normalized.dropped,
        normalized.duplicates
    );

    Ok(())
}
