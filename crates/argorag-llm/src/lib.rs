//! Argorag LLM - embedding and generation ports with the Ollama adapter.

pub mod ollama;
pub mod ports;

pub use ollama::{OllamaEmbedder, OllamaGenerator};
pub use ports::{Embedder, Generator};
