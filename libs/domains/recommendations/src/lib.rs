//! Recommendations Domain
//!
//! The two services the API is built on:
//!
//! - [`SyncService`]: reconciles the product catalog with the vector index.
//!   Stale rows are embedded and upserted in batches, flagged as indexed
//!   once the upsert is confirmed, and every run lands in the sync ledger.
//! - [`RecommendationService`]: similar-product and semantic queries with
//!   optional category/brand filters, normalized into a
//!   [`RecommendationList`].
//!
//! ```text
//!              ┌──────────────┐         ┌───────────────────────┐
//!              │ SyncService  │         │ RecommendationService │
//!              └──┬────┬────┬─┘         └─────────┬─────┬───────┘
//!                 │    │    │                     │     │
//!   CatalogRepository  │  EmbeddingProvider ◄─────┘     │
//!                 VectorRepository ◄──────────────────────┘
//! ```

pub mod document;
pub mod error;
pub mod handlers;
pub mod models;
pub mod recommendations;
pub mod settings;
pub mod sync;

pub use error::{RecommenderError, RecommenderResult, SyncError};
pub use handlers::{AdminApiDoc, ProductsApiDoc, admin_router, products_router};
pub use models::{QueryReference, RecommendationHit, RecommendationList};
pub use recommendations::{RecommendationService, build_filter};
pub use settings::SyncSettings;
pub use sync::SyncService;
