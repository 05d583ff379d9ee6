//! Immutable configuration for the ingestion pipeline and retrieval services.
//!
//! Values resolve defaults -> optional TOML file -> environment, and are
//! injected into components at construction. Nothing here is mutated after
//! startup.

use crate::error::{ArgoragError, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Mirror list and local layout for the offline ingestion pipeline.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Ordered GDAC mirror base URLs, tried first to last.
    pub mirrors: Vec<String>,
    /// Directory holding downloaded measurement files, keyed by base name.
    pub cache_dir: PathBuf,
    /// Master index file (CSV) listing every known float file.
    pub index_path: PathBuf,
    /// Flattened per-depth-level dataset written by the dataset builder.
    pub dataset_path: PathBuf,
    /// Directory for per-profile depth-series Parquet files.
    pub depth_dir: PathBuf,
    /// Per-mirror request timeout.
    pub fetch_timeout: Duration,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            mirrors: vec!["https://data-argo.ifremer.fr/dac".to_string()],
            cache_dir: PathBuf::from("data/raw/profiles"),
            index_path: PathBuf::from("data/raw/ArgoFloats-index.csv"),
            dataset_path: PathBuf::from("data/processed/argo_clean.csv"),
            depth_dir: PathBuf::from("data/profiles"),
            fetch_timeout: Duration::from_secs(60),
        }
    }
}

impl IngestConfig {
    pub fn validate(&self) -> Result<()> {
        if self.mirrors.is_empty() {
            return Err(ArgoragError::ConfigInvalid {
                key: "mirrors".to_string(),
                reason: "at least one mirror base URL is required".to_string(),
            });
        }
        Ok(())
    }
}

/// Connection settings for the Ollama embedding and generation models.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Base URL for the Ollama API (e.g., "http://localhost:11434").
    pub base_url: String,
    /// Model used to embed profile summaries and questions.
    pub embed_model: String,
    /// Embedding dimensions (model-specific).
    pub embed_dimensions: usize,
    /// Model used to translate questions into SQL.
    pub generate_model: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            embed_model: "nomic-embed-text".to_string(),
            embed_dimensions: 768,
            generate_model: "llama3.1".to_string(),
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub ingest: IngestConfig,
    pub ollama: OllamaConfig,
    /// PostgreSQL connection URL. `None` selects the in-memory backend.
    pub database_url: Option<String>,
}

impl AppConfig {
    /// Load configuration from an optional TOML file, then apply
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(path) = path {
            config = config.merge_file(path)?;
        }
        Ok(config.merge_env())
    }

    /// Merge values from a TOML file over the current configuration.
    pub fn merge_file(mut self, path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ArgoragError::ConfigInvalid {
            key: "file".to_string(),
            reason: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let file: FileConfig = toml::from_str(&content).map_err(|e| ArgoragError::ConfigInvalid {
            key: "file".to_string(),
            reason: format!("Failed to parse TOML: {}", e),
        })?;

        if let Some(ingest) = file.ingest {
            if let Some(mirrors) = ingest.mirrors {
                self.ingest.mirrors = mirrors;
            }
            if let Some(cache_dir) = ingest.cache_dir {
                self.ingest.cache_dir = cache_dir;
            }
            if let Some(index_path) = ingest.index_path {
                self.ingest.index_path = index_path;
            }
            if let Some(dataset_path) = ingest.dataset_path {
                self.ingest.dataset_path = dataset_path;
            }
            if let Some(depth_dir) = ingest.depth_dir {
                self.ingest.depth_dir = depth_dir;
            }
            if let Some(secs) = ingest.fetch_timeout_secs {
                self.ingest.fetch_timeout = Duration::from_secs(secs);
            }
        }

        if let Some(ollama) = file.ollama {
            if let Some(base_url) = ollama.base_url {
                self.ollama.base_url = base_url;
            }
            if let Some(embed_model) = ollama.embed_model {
                self.ollama.embed_model = embed_model;
            }
            if let Some(dim) = ollama.embed_dimensions {
                self.ollama.embed_dimensions = dim;
            }
            if let Some(generate_model) = ollama.generate_model {
                self.ollama.generate_model = generate_model;
            }
        }

        if file.database_url.is_some() {
            self.database_url = file.database_url;
        }

        Ok(self)
    }

    /// Apply environment variable overrides.
    pub fn merge_env(mut self) -> Self {
        if let Ok(url) = env::var("DATABASE_URL") {
            if !url.trim().is_empty() {
                self.database_url = Some(url);
            }
        }
        if let Ok(url) = env::var("ARGORAG_OLLAMA_URL") {
            self.ollama.base_url = url;
        }
        if let Ok(model) = env::var("ARGORAG_EMBED_MODEL") {
            self.ollama.embed_model = model;
        }
        if let Ok(dim) = env::var("ARGORAG_EMBED_DIM") {
            match dim.parse::<usize>() {
                Ok(dim) => self.ollama.embed_dimensions = dim,
                Err(_) => tracing::warn!(
                    "Invalid ARGORAG_EMBED_DIM value '{}': expected integer",
                    dim
                ),
            }
        }
        if let Ok(model) = env::var("ARGORAG_GENERATE_MODEL") {
            self.ollama.generate_model = model;
        }
        self
    }
}

/// Configuration as it appears in a TOML file; every field optional.
#[derive(Debug, Deserialize)]
struct FileConfig {
    ingest: Option<FileIngestConfig>,
    ollama: Option<FileOllamaConfig>,
    database_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FileIngestConfig {
    mirrors: Option<Vec<String>>,
    cache_dir: Option<PathBuf>,
    index_path: Option<PathBuf>,
    dataset_path: Option<PathBuf>,
    depth_dir: Option<PathBuf>,
    fetch_timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct FileOllamaConfig {
    base_url: Option<String>,
    embed_model: Option<String>,
    embed_dimensions: Option<usize>,
    generate_model: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.ingest.mirrors.len(), 1);
        assert_eq!(config.ollama.embed_model, "nomic-embed-text");
        assert_eq!(config.ollama.embed_dimensions, 768);
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_merge_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
database_url = "postgresql://localhost/argo"

[ingest]
mirrors = ["https://usgodae.org/pub/outgoing/argo/dac", "https://data-argo.ifremer.fr/dac"]
fetch_timeout_secs = 30

[ollama]
embed_model = "all-minilm"
embed_dimensions = 384
"#
        )
        .unwrap();

        let config = AppConfig::default().merge_file(file.path()).unwrap();

        assert_eq!(config.ingest.mirrors.len(), 2);
        assert_eq!(config.ingest.fetch_timeout, Duration::from_secs(30));
        assert_eq!(config.ollama.embed_model, "all-minilm");
        assert_eq!(config.ollama.embed_dimensions, 384);
        // Untouched fields keep their defaults
        assert_eq!(config.ollama.generate_model, "llama3.1");
        assert_eq!(config.database_url.as_deref(), Some("postgresql://localhost/argo"));
    }

    #[test]
    fn test_merge_file_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not = [valid").unwrap();
        assert!(AppConfig::default().merge_file(file.path()).is_err());
    }

    #[test]
    fn test_empty_mirror_list_rejected() {
        let config = IngestConfig { mirrors: Vec::new(), ..IngestConfig::default() };
        assert!(config.validate().is_err());
    }
}
