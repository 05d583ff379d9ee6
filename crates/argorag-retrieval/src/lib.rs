//! Argorag Retrieval - the query-time path from a free-text question to
//! rows, plus the offline semantic index builder.
//!
//! A question either becomes a constrained SQL query (translate -> guard
//! -> execute) or a nearest-neighbor lookup over summary embeddings.

pub mod guard;
pub mod indexer;
pub mod retrieve;
pub mod translate;

pub use indexer::{IndexReport, VectorIndexBuilder};
pub use retrieve::{HybridRetriever, RetrievalOutcome, DEFAULT_TOP_K};
pub use translate::{QueryTranslator, SchemaDescription};
