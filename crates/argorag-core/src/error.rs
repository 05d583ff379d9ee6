//! Error types for argorag

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArgoragError {
    // Ingestion errors
    #[error("Profile {file} not found on any mirror ({mirrors_tried} tried)")]
    Fetch { file: String, mirrors_tried: usize },

    #[error("Unreadable measurement file {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Row dropped during normalization: {reason}")]
    Validation { reason: String },

    // Retrieval errors
    #[error("Query translation failed: {reason}")]
    Translation { reason: String },

    #[error("Store unavailable: {reason}")]
    StoreUnavailable { reason: String },

    #[error("Query execution failed: {reason}")]
    Execution { reason: String },

    #[error("No depth series stored for profile {profile_id}")]
    DepthSeriesNotFound { profile_id: String },

    // Embedder errors
    #[error("Embedder unavailable: {reason}. Try: {remediation}")]
    EmbedderUnavailable { reason: String, remediation: String },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, ArgoragError>;
