use std::env;
use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use argorag_api::routes::create_router;
use argorag_api::state::AppState;
use argorag_core::config::AppConfig;
use argorag_ingest::DepthSeriesStore;
use argorag_llm::{OllamaEmbedder, OllamaGenerator};
use argorag_retrieval::{HybridRetriever, QueryTranslator};
use argorag_store::memory::{MemoryProfileStore, MemoryVectorStore};
use argorag_store::postgres::{PostgresConfig, PostgresStore};
use argorag_store::{ProfileStore, VectorStore};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "argorag_api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let port: u16 = env::var("ARGORAG_PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(8000);

    let config = match AppConfig::load(None) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(
        port = port,
        embed_model = %config.ollama.embed_model,
        generate_model = %config.ollama.generate_model,
        "Starting argorag API server"
    );

    // Initialize storage backend based on DATABASE_URL
    let (profiles, vectors): (Arc<dyn ProfileStore>, Arc<dyn VectorStore>) =
        match &config.database_url {
            Some(database_url) => {
                tracing::info!("DATABASE_URL found, connecting to PostgreSQL...");
                match init_postgres_storage(database_url).await {
                    Ok(store) => {
                        tracing::info!("Connected to PostgreSQL");
                        (store.clone(), store)
                    }
                    Err(e) => {
                        tracing::error!("Failed to connect to PostgreSQL: {}", e);
                        tracing::error!(
                            "Remediation:\n\
                            1. Ensure PostgreSQL is running\n\
                            2. Verify DATABASE_URL is correct\n\
                            3. Check that the database exists and is accessible"
                        );
                        std::process::exit(1);
                    }
                }
            }
            None => {
                tracing::info!("Using in-memory storage (set DATABASE_URL for PostgreSQL)");
                (Arc::new(MemoryProfileStore::new()), Arc::new(MemoryVectorStore::new()))
            }
        };

    let translator = QueryTranslator::new(OllamaGenerator::from_config(&config.ollama));
    let embedder = Arc::new(OllamaEmbedder::from_config(&config.ollama));
    let retriever = HybridRetriever::new(profiles, vectors, embedder);
    let depth_store = DepthSeriesStore::new(config.ingest.depth_dir.clone());

    let state = Arc::new(AppState::new(translator, retriever, depth_store));

    let cors = CorsLayer::new()
        .allow_origin("http://localhost:3000".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let app = create_router(state).layer(cors);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();

    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await.unwrap();
}

/// Initialize PostgreSQL storage from a database URL
async fn init_postgres_storage(database_url: &str) -> Result<Arc<PostgresStore>, String> {
    let config = PostgresConfig::new(database_url.to_string())
        .map_err(|e| format!("Invalid DATABASE_URL: {}", e))?;

    PostgresStore::with_schema(config)
        .await
        .map(Arc::new)
        .map_err(|e| format!("Connection failed: {}", e))
}
