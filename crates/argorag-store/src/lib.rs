//! Argorag Store - storage ports and adapters.
//!
//! The relational (profiles) and vector (summary embeddings) stores are
//! eventually-consistent siblings built from the same source; each hides
//! behind a narrow port so the backends can evolve independently.

pub mod memory;
pub mod ports;
pub mod postgres;

pub use ports::{ProfileStore, VectorStore};
pub use postgres::PostgresStore;
