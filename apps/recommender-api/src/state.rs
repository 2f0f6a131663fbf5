//! Application state shared by every router.

use std::sync::Arc;

use axum_helpers::BearerToken;
use domain_catalog::{CatalogRepository, PgCatalogRepository};
use domain_recommendations::{RecommendationService, SyncService};
use domain_vector::{EmbeddingProvider, OpenAIProvider, QdrantRepository, VectorRepository};
use eyre::WrapErr;
use sea_orm::DatabaseConnection;
use tokio::sync::Mutex;

use crate::config::Config;

/// Cloned per router; every field is an `Arc` or wraps one.
#[derive(Clone)]
pub struct AppState {
    pub sync: SyncService,
    pub recommendations: RecommendationService,
    /// Serializes HTTP-triggered sync runs
    pub sync_lock: Arc<Mutex<()>>,
    pub admin_token: BearerToken,
}

impl AppState {
    pub fn new(
        sync: SyncService,
        recommendations: RecommendationService,
        admin_token: BearerToken,
    ) -> Self {
        Self {
            sync,
            recommendations,
            sync_lock: Arc::new(Mutex::new(())),
            admin_token,
        }
    }

    /// Wire the Postgres catalog, the Qdrant index and the OpenAI embedder.
    ///
    /// The index and embedder instances are shared by both services.
    pub fn from_config(config: &Config, db: DatabaseConnection) -> eyre::Result<Self> {
        let catalog: Arc<dyn CatalogRepository> = Arc::new(PgCatalogRepository::new(db));

        let index: Arc<dyn VectorRepository> = Arc::new(
            QdrantRepository::new(config.qdrant.clone(), u64::from(config.openai.dimension))
                .wrap_err("Failed to build Qdrant client")?,
        );

        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(
            OpenAIProvider::new(config.openai.clone())
                .wrap_err("Failed to build embedding client")?,
        );

        let sync = SyncService::new(catalog, index.clone(), embedder.clone(), config.sync);
        let recommendations = RecommendationService::new(index, embedder);

        Ok(Self::new(
            sync,
            recommendations,
            BearerToken::new(config.admin_token.as_str()),
        ))
    }
}
