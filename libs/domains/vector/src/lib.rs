//! Vector Domain Library
//!
//! Storage and similarity search for product embeddings.
//!
//! ```text
//! ┌──────────────────┐     ┌───────────────────┐
//! │ VectorRepository │     │ EmbeddingProvider │
//! │     (trait)      │     │      (trait)      │
//! └────────┬─────────┘     └─────────┬─────────┘
//!          │                         │
//! ┌────────▼─────────┐     ┌─────────▼─────────┐
//! │ QdrantRepository │     │  OpenAIProvider   │
//! │ InMemoryVector.. │     └───────────────────┘
//! └──────────────────┘
//! ```
//!
//! Points are keyed by the catalog product id. Ids that are neither an
//! unsigned integer nor a UUID are mapped to a stable UUIDv5, and the
//! catalog id travels in the `product_id` payload field.

pub mod embedding;
pub mod error;
pub mod memory;
pub mod models;
pub mod qdrant;
pub mod repository;

pub use embedding::{EmbeddingProvider, OpenAIConfig, OpenAIProvider};
pub use error::{VectorError, VectorResult};
pub use memory::InMemoryVectorRepository;
pub use models::{
    CollectionStats, DistanceMetric, Payload, SearchFilter, SearchHit, VectorConfig,
};
pub use qdrant::{QdrantConfig, QdrantRepository};
pub use repository::{VectorRepository, check_parallel_lengths};
