use anyhow::{bail, Result};
use argorag_core::config::AppConfig;
use argorag_core::models::RowMap;
use argorag_llm::{OllamaEmbedder, OllamaGenerator};
use argorag_retrieval::{HybridRetriever, QueryTranslator, RetrievalOutcome};
use argorag_store::memory::{MemoryProfileStore, MemoryVectorStore};
use argorag_store::{ProfileStore, VectorStore};
use console::style;
use serde_json::Value;
use std::sync::Arc;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::AskArgs;
use super::postgres_store;

pub async fn execute(args: AskArgs, config: &AppConfig, json: bool) -> Result<()> {
    let (profiles, vectors): (Arc<dyn ProfileStore>, Arc<dyn VectorStore>) =
        if config.database_url.is_some() {
            let store = postgres_store(config).await?;
            (store.clone(), store)
        } else {
            (Arc::new(MemoryProfileStore::new()), Arc::new(MemoryVectorStore::new()))
        };

    let embedder = Arc::new(OllamaEmbedder::from_config(&config.ollama));
    let retriever = HybridRetriever::new(profiles, vectors, embedder);

    if args.semantic {
        let matches = retriever.semantic(&args.question, Some(args.top_k)).await?;

        if json {
            println!("{}", serde_json::to_string_pretty(&matches)?);
            return Ok(());
        }

        if matches.is_empty() {
            println!("No matching profiles.");
            return Ok(());
        }

        let mut builder = Builder::default();
        builder.push_record(["profile_id", "distance", "summary"]);
        for m in &matches {
            builder.push_record([
                m.profile_id.clone(),
                format!("{:.4}", m.distance),
                m.summary.clone(),
            ]);
        }
        println!("{}", builder.build().with(Style::rounded()));
        return Ok(());
    }

    let translator = QueryTranslator::new(OllamaGenerator::from_config(&config.ollama));
    let Some(sql) = translator.translate(&args.question).await else {
        bail!("failed to translate the question into a query");
    };

    tracing::info!(%sql, "executing translated query");

    match retriever.execute(&sql).await {
        RetrievalOutcome::Rows(rows) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if rows.is_empty() {
                println!("No matching profiles.");
            } else {
                println!("{}", render_rows(&rows));
            }
            Ok(())
        }
        RetrievalOutcome::Failed { error } => {
            println!("{} {}", style("Query failed:").red().bold(), error);
            Ok(())
        }
    }
}

/// Render result rows as a table, columns taken from the first row.
fn render_rows(rows: &[RowMap]) -> String {
    let columns: Vec<&String> = rows[0].keys().collect();

    let mut builder = Builder::default();
    builder.push_record(columns.iter().map(|c| c.to_string()));
    for row in rows {
        builder.push_record(columns.iter().map(|c| cell(row.get(*c))));
    }

    builder.build().with(Style::rounded()).to_string()
}

fn cell(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
