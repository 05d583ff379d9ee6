use argorag_core::config::OllamaConfig;
use argorag_core::error::{ArgoragError, Result};
use crate::ports::{Embedder, Generator};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Ollama embedder implementation
pub struct OllamaEmbedder {
    /// Base URL for Ollama API (e.g., "http://localhost:11434")
    base_url: String,

    /// Model name to use for embeddings
    model: String,

    /// Embedding dimensions (model-specific)
    dimensions: usize,

    /// HTTP client
    client: reqwest::Client,
}

impl OllamaEmbedder {
    /// Create a new Ollama embedder
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, dimensions: usize) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            dimensions,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &OllamaConfig) -> Self {
        Self::new(&config.base_url, &config.embed_model, config.embed_dimensions)
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());

        for text in texts {
            let request = OllamaEmbedRequest {
                model: self.model.clone(),
                prompt: text.to_string(),
            };

            let response = self
                .client
                .post(format!("{}/api/embeddings", self.base_url))
                .json(&request)
                .send()
                .await
                .map_err(|e| ArgoragError::EmbedderUnavailable {
                    reason: format!("Failed to connect to Ollama: {}", e),
                    remediation: format!(
                        "Ensure Ollama is running at {} and the model '{}' is available. \
                         Run 'ollama pull {}' to download the model.",
                        self.base_url, self.model, self.model
                    ),
                })?;

            if !response.status().is_success() {
                let status = response.status();
                let error_text = response.text().await.unwrap_or_default();
                return Err(ArgoragError::EmbedderUnavailable {
                    reason: format!("Ollama API error ({}): {}", status, error_text),
                    remediation: format!(
                        "Check that the model '{}' is available. Run 'ollama list' to see installed models.",
                        self.model
                    ),
                });
            }

            let embed_response: OllamaEmbedResponse =
                response.json().await.map_err(|e| ArgoragError::EmbedderUnavailable {
                    reason: format!("Failed to parse Ollama response: {}", e),
                    remediation: "Check Ollama API compatibility".to_string(),
                })?;

            embeddings.push(embed_response.embedding);
        }

        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Request body for Ollama embeddings API
#[derive(Debug, Serialize)]
struct OllamaEmbedRequest {
    model: String,
    prompt: String,
}

/// Response from Ollama embeddings API
#[derive(Debug, Deserialize)]
struct OllamaEmbedResponse {
    embedding: Vec<f32>,
}

/// Ollama text generation client, used to translate questions into SQL.
pub struct OllamaGenerator {
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaGenerator {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &OllamaConfig) -> Self {
        Self::new(&config.base_url, &config.generate_model)
    }

    pub fn model_name(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Generator for OllamaGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = OllamaGenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| ArgoragError::Translation {
                reason: format!("Failed to connect to Ollama at {}: {}", self.base_url, e),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ArgoragError::Translation {
                reason: format!("Ollama API error ({}): {}", status, error_text),
            });
        }

        let generate_response: OllamaGenerateResponse =
            response.json().await.map_err(|e| ArgoragError::Translation {
                reason: format!("Failed to parse Ollama response: {}", e),
            })?;

        Ok(generate_response.response)
    }
}

/// Request body for the Ollama generate API
#[derive(Debug, Serialize)]
struct OllamaGenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
}

/// Response from the Ollama generate API
#[derive(Debug, Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ollama_embedder_creation() {
        let embedder = OllamaEmbedder::new("http://localhost:11434", "nomic-embed-text", 768);
        assert_eq!(embedder.model_name(), "nomic-embed-text");
        assert_eq!(embedder.dimensions(), 768);
    }

    #[test]
    fn test_ollama_embedder_from_config() {
        let config = OllamaConfig::default();
        let embedder = OllamaEmbedder::from_config(&config);
        assert_eq!(embedder.model_name(), config.embed_model);
        assert_eq!(embedder.dimensions(), config.embed_dimensions);
    }

    #[test]
    fn test_ollama_generator_creation() {
        let generator = OllamaGenerator::new("http://custom:11434", "llama3.1");
        assert_eq!(generator.base_url, "http://custom:11434");
        assert_eq!(generator.model_name(), "llama3.1");
    }
}
