use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use domain_catalog::{CatalogError, CatalogRepository, CatalogResult, ProductRecord, SyncRun};
use domain_vector::{
    CollectionStats, EmbeddingProvider, VectorError, VectorRepository, VectorResult,
};
use observability::SyncMetrics;
use thiserror::Error;
use tracing::Instrument;

use crate::document::{embeddable_document, index_payload};
use crate::error::SyncError;
use crate::models::{CollectionInfo, ConnectionTestResponse, SyncStatusResponse};
use crate::settings::SyncSettings;

/// Why a batch counted as failed
#[derive(Debug, Error)]
enum BatchFailure {
    #[error("embedding failed: {0}")]
    Embedding(VectorError),

    #[error("index upsert failed: {0}")]
    Upsert(VectorError),

    #[error("catalog write-back failed: {0}")]
    WriteBack(CatalogError),
}

/// Catalog → vector index reconciliation.
///
/// A run discovers stale products, embeds and upserts them batch by batch,
/// flags the rows that made it into the index and appends the outcome to the
/// sync ledger. Adapter failures never escape a run: they are counted against
/// the batch they hit and recorded in the run's errors.
#[derive(Clone)]
pub struct SyncService {
    catalog: Arc<dyn CatalogRepository>,
    index: Arc<dyn VectorRepository>,
    embedder: Arc<dyn EmbeddingProvider>,
    settings: SyncSettings,
}

impl SyncService {
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        index: Arc<dyn VectorRepository>,
        embedder: Arc<dyn EmbeddingProvider>,
        settings: SyncSettings,
    ) -> Self {
        Self {
            catalog,
            index,
            embedder,
            settings,
        }
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    /// Run one reconciliation pass.
    ///
    /// `force_reindex` re-embeds every product instead of only unindexed ones.
    /// The only error is an out-of-range `batch_size`, rejected before any
    /// side effect; every other failure is reported inside the returned run.
    #[tracing::instrument(skip(self), fields(sync_id = tracing::field::Empty))]
    pub async fn run_sync(
        &self,
        batch_size: usize,
        force_reindex: bool,
    ) -> Result<SyncRun, SyncError> {
        if !self.settings.accepts(batch_size) {
            SyncMetrics::record_rejected("invalid_batch_size");
            return Err(SyncError::InvalidBatchSize {
                requested: batch_size,
                max: self.settings.max_batch_size,
            });
        }

        let started = Instant::now();
        let mut run = SyncRun::start(u32::try_from(batch_size).unwrap_or(u32::MAX));
        tracing::Span::current().record("sync_id", tracing::field::display(run.sync_id));
        tracing::info!(batch_size, force_reindex, "Starting product sync");

        if let Err(e) = self.index.ensure_collection().await {
            tracing::error!(error = %e, "Vector collection is not usable");
            run.abort(format!("Failed to prepare vector collection: {e}"));
            return Ok(self.finish(run, started).await);
        }

        let products = match self.discover(force_reindex).await {
            Ok(products) => products,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read stale products");
                run.abort(format!("Failed to fetch products: {e}"));
                return Ok(self.finish(run, started).await);
            }
        };

        run.total_products = u32::try_from(products.len()).unwrap_or(u32::MAX);
        if products.is_empty() {
            tracing::info!("No products to sync");
            run.complete();
            return Ok(self.finish(run, started).await);
        }

        tracing::info!(total = products.len(), "Found products to sync");

        for (number, batch) in products.chunks(batch_size).enumerate() {
            let number = number + 1;
            let size = u32::try_from(batch.len()).unwrap_or(u32::MAX);
            let span = tracing::info_span!("batch", batch = number, size);

            match self.process_batch(batch).instrument(span).await {
                Ok(()) => {
                    run.processed_products += size;
                    tracing::info!(
                        batch = number,
                        processed = run.processed_products,
                        total = run.total_products,
                        "Batch synced"
                    );
                }
                Err(failure) => {
                    run.failed_products += size;
                    tracing::error!(batch = number, error = %failure, "Batch failed");
                    run.record_error(format!("Batch {number}: {failure}"));
                }
            }
        }

        run.complete();
        Ok(self.finish(run, started).await)
    }

    async fn discover(&self, force_reindex: bool) -> CatalogResult<Vec<ProductRecord>> {
        if force_reindex {
            self.catalog.fetch_all_products().await
        } else {
            self.catalog
                .fetch_stale_products(self.settings.discovery_limit)
                .await
        }
    }

    /// Embed, upsert, then flag. A row is flagged only after its upsert
    /// returned, and a failed flag update fails the whole batch.
    async fn process_batch(&self, batch: &[ProductRecord]) -> Result<(), BatchFailure> {
        let documents: Vec<String> = batch.iter().map(embeddable_document).collect();

        let vectors = self
            .embedder
            .embed(&documents)
            .await
            .map_err(BatchFailure::Embedding)?;

        if vectors.len() != documents.len() {
            return Err(BatchFailure::Embedding(VectorError::Embedding(format!(
                "Expected {} embeddings, got {}",
                documents.len(),
                vectors.len()
            ))));
        }

        let ids: Vec<String> = batch.iter().map(|p| p.product_id.clone()).collect();
        let payloads = batch.iter().map(index_payload).collect();

        self.index
            .upsert_batch(ids.clone(), vectors, payloads)
            .await
            .map_err(BatchFailure::Upsert)?;

        let updated = self
            .catalog
            .mark_indexed(&ids, Utc::now())
            .await
            .map_err(BatchFailure::WriteBack)?;

        if updated != ids.len() as u64 {
            tracing::warn!(
                expected = ids.len(),
                updated,
                "Fewer catalog rows flagged than upserted"
            );
        }

        Ok(())
    }

    /// Ledger append and metrics; neither can change the run
    async fn finish(&self, run: SyncRun, started: Instant) -> SyncRun {
        if let Err(e) = self.catalog.append_sync_run(&run).await {
            tracing::error!(error = %e, "Failed to record sync run");
        }

        SyncMetrics::record_run(
            &run.status.to_string(),
            run.processed_products as usize,
            run.failed_products as usize,
            started.elapsed().as_secs_f64(),
        );

        tracing::info!(
            status = %run.status,
            processed = run.processed_products,
            failed = run.failed_products,
            duration_seconds = run.duration_seconds.unwrap_or_default(),
            "{}",
            run.summary()
        );

        run
    }

    /// Most recent ledger entry
    pub async fn last_sync_run(&self) -> CatalogResult<Option<SyncRun>> {
        self.catalog.fetch_last_sync_run().await
    }

    pub async fn collection_stats(&self) -> VectorResult<CollectionStats> {
        self.index.collection_stats().await
    }

    pub async fn ping_catalog(&self) -> bool {
        self.catalog.ping().await
    }

    pub async fn ping_index(&self) -> bool {
        self.index.ping().await
    }

    /// Last run, collection stats and reachability of both stores
    pub async fn sync_status(&self) -> SyncStatusResponse {
        let (last_sync, stats, database_status, qdrant_status) = tokio::join!(
            self.last_sync_run(),
            self.collection_stats(),
            self.ping_catalog(),
            self.ping_index(),
        );

        let last_sync = last_sync.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to read last sync run");
            None
        });

        SyncStatusResponse {
            last_sync,
            collection_info: CollectionInfo::from(stats),
            database_status,
            qdrant_status,
        }
    }

    pub async fn test_connections(&self) -> ConnectionTestResponse {
        let (postgres_status, qdrant_status) = tokio::join!(self.ping_catalog(), self.ping_index());

        let postgres_message = if postgres_status {
            "PostgreSQL connection successful"
        } else {
            "PostgreSQL connection failed"
        };

        let qdrant_message = if qdrant_status {
            match self.collection_stats().await {
                Ok(stats) => format!(
                    "Connected successfully. Collection '{}' holds {} points.",
                    stats.collection_name, stats.points_count
                ),
                Err(_) => "Connected successfully. Collection not created yet.".to_string(),
            }
        } else {
            "Connection failed".to_string()
        };

        ConnectionTestResponse {
            postgres_status,
            qdrant_status,
            postgres_message: postgres_message.to_string(),
            qdrant_message,
        }
    }
}
