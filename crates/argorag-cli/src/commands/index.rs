use anyhow::Result;
use argorag_core::config::AppConfig;
use argorag_llm::OllamaEmbedder;
use argorag_retrieval::VectorIndexBuilder;
use console::style;
use std::sync::Arc;

use crate::cli::IndexArgs;
use super::postgres_store;

pub async fn execute(_args: IndexArgs, config: &AppConfig) -> Result<()> {
    let store = postgres_store(config).await?;
    let embedder = Arc::new(OllamaEmbedder::from_config(&config.ollama));

    let builder = VectorIndexBuilder::new(store.clone(), store.clone(), embedder);
    let report = builder.run().await?;

    // ANN index over the freshly upserted embeddings
    store.create_vector_index().await?;

    println!(
        "{} {} summaries embedded, collection holds {} documents",
        style("Indexed").green().bold(),
        report.indexed,
        report.total
    );

    Ok(())
}
