use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::{
    entity::{product, sync_history},
    error::CatalogResult,
    models::{ProductRecord, SyncRun},
    repository::CatalogRepository,
};

/// Postgres-backed catalog over the products_new and sync_history tables
#[derive(Clone)]
pub struct PgCatalogRepository {
    db: DatabaseConnection,
}

impl PgCatalogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Insert products, replacing descriptive columns of existing ids.
    ///
    /// The indexed flag of an existing row is left untouched. Used for
    /// seeding and by integration tests.
    pub async fn insert_products(&self, products: &[ProductRecord]) -> CatalogResult<()> {
        if products.is_empty() {
            return Ok(());
        }

        let models: Vec<product::ActiveModel> = products.iter().map(Into::into).collect();

        product::Entity::insert_many(models)
            .on_conflict(
                OnConflict::column(product::Column::ProductId)
                    .update_columns([
                        product::Column::Name,
                        product::Column::Category,
                        product::Column::Description,
                        product::Column::Brand,
                        product::Column::ProductType,
                        product::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;

        tracing::info!(count = products.len(), "Inserted catalog products");
        Ok(())
    }
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    async fn fetch_stale_products(&self, limit: u64) -> CatalogResult<Vec<ProductRecord>> {
        let models = product::Entity::find()
            .filter(
                Condition::any()
                    .add(product::Column::QdrantIndexed.eq(false))
                    .add(product::Column::QdrantIndexed.is_null()),
            )
            .order_by_asc(product::Column::ProductId)
            .limit(limit)
            .all(&self.db)
            .await?;

        tracing::info!(count = models.len(), "Found products to sync");
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn fetch_all_products(&self) -> CatalogResult<Vec<ProductRecord>> {
        let models = product::Entity::find()
            .order_by_asc(product::Column::ProductId)
            .all(&self.db)
            .await?;

        tracing::info!(count = models.len(), "Loaded all products for reindex");
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn mark_indexed(&self, ids: &[String], at: DateTime<Utc>) -> CatalogResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = product::Entity::update_many()
            .col_expr(product::Column::QdrantIndexed, Expr::value(true))
            .col_expr(product::Column::QdrantIndexedAt, Expr::value(at))
            .col_expr(product::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(product::Column::ProductId.is_in(ids.iter().cloned()))
            .exec(&self.db)
            .await?;

        tracing::info!(
            requested = ids.len(),
            updated = result.rows_affected,
            "Updated sync status for products"
        );
        Ok(result.rows_affected)
    }

    async fn append_sync_run(&self, run: &SyncRun) -> CatalogResult<()> {
        let model = sync_history::ActiveModel::try_from(run)?;

        sync_history::Entity::insert(model).exec(&self.db).await?;

        tracing::debug!(sync_id = %run.sync_id, status = %run.status, "Recorded sync run");
        Ok(())
    }

    async fn fetch_last_sync_run(&self) -> CatalogResult<Option<SyncRun>> {
        let model = sync_history::Entity::find()
            .order_by_desc(sync_history::Column::StartedAt)
            .one(&self.db)
            .await?;

        model.map(SyncRun::try_from).transpose()
    }

    async fn ping(&self) -> bool {
        match self.db.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Postgres ping failed");
                false
            }
        }
    }
}
