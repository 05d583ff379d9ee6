use anyhow::Result;
use argorag_core::config::AppConfig;
use argorag_store::{ProfileStore, VectorStore};
use console::style;
use serde_json::json;

use crate::cli::StatusArgs;
use super::postgres_store;

pub async fn execute(_args: StatusArgs, config: &AppConfig, json: bool) -> Result<()> {
    let store = postgres_store(config).await?;

    let profiles = store.profile_count().await?;
    // The embeddings table only exists once the index has been built
    let vectors = store.count().await.ok();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "profiles": profiles,
                "embedded_summaries": vectors,
            }))?
        );
        return Ok(());
    }

    println!("{}", style("Store status").bold());
    println!("  profiles:           {}", profiles);
    match vectors {
        Some(count) => println!("  embedded summaries: {}", count),
        None => println!("  embedded summaries: (index not built)"),
    }

    Ok(())
}
