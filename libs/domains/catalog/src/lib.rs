//! Catalog Domain
//!
//! Relational side of the recommender: the product table that feeds the
//! vector index and the append-only ledger of sync runs.
//!
//! ```text
//! ┌────────────────────┐
//! │ CatalogRepository  │  ← trait; Postgres and in-memory implementations
//! └─────────┬──────────┘
//!           │
//! ┌─────────▼──────────┐
//! │  Entities / Models │  ← products_new, sync_history ↔ ProductRecord, SyncRun
//! └────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_catalog::{CatalogRepository, InMemoryCatalogRepository};
//!
//! # async fn demo() -> domain_catalog::CatalogResult<()> {
//! let catalog = InMemoryCatalogRepository::new();
//! let stale = catalog.fetch_stale_products(100).await?;
//! # Ok(()) }
//! ```

pub mod connection;
pub mod entity;
pub mod error;
pub mod models;
pub mod postgres;
pub mod repository;

pub use connection::{connect, connect_with_retry, RetryConfig};
pub use error::{CatalogError, CatalogResult};
pub use models::{ProductRecord, SyncRun, SyncStatus, MAX_RECORDED_ERRORS};
pub use postgres::PgCatalogRepository;
pub use repository::{CatalogRepository, InMemoryCatalogRepository};
