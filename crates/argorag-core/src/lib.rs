//! Argorag Core - Domain models, error taxonomy, and configuration
//!
//! This crate contains the core domain types shared by the ingestion and
//! retrieval layers of the argorag system.

pub mod config;
pub mod error;
pub mod models;

pub use error::{ArgoragError, Result};
