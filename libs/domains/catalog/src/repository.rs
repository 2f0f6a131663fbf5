use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::CatalogResult;
use crate::models::{ProductRecord, SyncRun};

/// Repository trait for the product catalog and the sync ledger
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Products whose indexed flag is false or NULL, ordered by product id
    async fn fetch_stale_products(&self, limit: u64) -> CatalogResult<Vec<ProductRecord>>;

    /// Every product, ordered by product id
    async fn fetch_all_products(&self) -> CatalogResult<Vec<ProductRecord>>;

    /// Set the indexed flag and timestamp for `ids` in one statement.
    ///
    /// Returns the number of rows touched.
    async fn mark_indexed(&self, ids: &[String], at: DateTime<Utc>) -> CatalogResult<u64>;

    /// Append a finished run to the ledger
    async fn append_sync_run(&self, run: &SyncRun) -> CatalogResult<()>;

    /// Most recently started run, if any
    async fn fetch_last_sync_run(&self) -> CatalogResult<Option<SyncRun>>;

    /// Cheap reachability check
    async fn ping(&self) -> bool;
}

/// In-memory implementation of CatalogRepository (for development/testing)
///
/// Products live in a `BTreeMap` so iteration order is product-id order,
/// matching the ORDER BY of the Postgres implementation.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalogRepository {
    products: Arc<RwLock<BTreeMap<String, ProductRecord>>>,
    runs: Arc<RwLock<Vec<SyncRun>>>,
}

impl InMemoryCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: impl IntoIterator<Item = ProductRecord>) -> Self {
        let map = products
            .into_iter()
            .map(|p| (p.product_id.clone(), p))
            .collect();

        Self {
            products: Arc::new(RwLock::new(map)),
            runs: Arc::default(),
        }
    }

    /// Insert or replace a product
    pub async fn upsert_product(&self, product: ProductRecord) {
        self.products
            .write()
            .await
            .insert(product.product_id.clone(), product);
    }

    pub async fn product(&self, product_id: &str) -> Option<ProductRecord> {
        self.products.read().await.get(product_id).cloned()
    }

    pub async fn products(&self) -> Vec<ProductRecord> {
        self.products.read().await.values().cloned().collect()
    }

    /// Ledger contents in append order
    pub async fn sync_runs(&self) -> Vec<SyncRun> {
        self.runs.read().await.clone()
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn fetch_stale_products(&self, limit: u64) -> CatalogResult<Vec<ProductRecord>> {
        let products = self.products.read().await;
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);

        Ok(products
            .values()
            .filter(|p| p.is_stale())
            .take(limit)
            .cloned()
            .collect())
    }

    async fn fetch_all_products(&self) -> CatalogResult<Vec<ProductRecord>> {
        Ok(self.products.read().await.values().cloned().collect())
    }

    async fn mark_indexed(&self, ids: &[String], at: DateTime<Utc>) -> CatalogResult<u64> {
        let mut products = self.products.write().await;
        let mut touched = 0;

        for id in ids {
            if let Some(product) = products.get_mut(id) {
                product.mark_indexed(at);
                touched += 1;
            }
        }

        tracing::debug!(requested = ids.len(), touched, "Marked products indexed");
        Ok(touched)
    }

    async fn append_sync_run(&self, run: &SyncRun) -> CatalogResult<()> {
        self.runs.write().await.push(run.clone());
        Ok(())
    }

    async fn fetch_last_sync_run(&self) -> CatalogResult<Option<SyncRun>> {
        let runs = self.runs.read().await;
        Ok(runs.iter().max_by_key(|r| r.started_at).cloned())
    }

    async fn ping(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str) -> ProductRecord {
        ProductRecord::new(id, format!("Product {id}"), "Tools", "Acme", "Hand", "")
    }

    #[tokio::test]
    async fn test_stale_products_ordered_and_limited() {
        let repo = InMemoryCatalogRepository::with_products(
            ["c", "a", "d", "b"].into_iter().map(product),
        );

        let stale = repo.fetch_stale_products(3).await.unwrap();
        let ids: Vec<_> = stale.iter().map(|p| p.product_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_mark_indexed_excludes_from_stale() {
        let repo = InMemoryCatalogRepository::with_products(["a", "b"].into_iter().map(product));
        let at = Utc::now();

        let touched = repo
            .mark_indexed(&["a".to_string(), "missing".to_string()], at)
            .await
            .unwrap();
        assert_eq!(touched, 1);

        let stale = repo.fetch_stale_products(10).await.unwrap();
        assert_eq!(stale.len(), 1);
        assert_eq!(stale[0].product_id, "b");

        let a = repo.product("a").await.unwrap();
        assert!(a.qdrant_indexed);
        assert_eq!(a.qdrant_indexed_at, Some(at));
    }

    #[tokio::test]
    async fn test_fetch_all_includes_indexed() {
        let repo = InMemoryCatalogRepository::with_products(["a", "b"].into_iter().map(product));
        repo.mark_indexed(&["a".to_string()], Utc::now()).await.unwrap();

        assert_eq!(repo.fetch_all_products().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_last_sync_run_is_latest_started() {
        let repo = InMemoryCatalogRepository::new();
        assert!(repo.fetch_last_sync_run().await.unwrap().is_none());

        let mut older = SyncRun::start(10);
        older.started_at -= chrono::Duration::minutes(5);
        older.complete();
        let mut newer = SyncRun::start(20);
        newer.complete();

        repo.append_sync_run(&newer).await.unwrap();
        repo.append_sync_run(&older).await.unwrap();

        let last = repo.fetch_last_sync_run().await.unwrap().unwrap();
        assert_eq!(last.sync_id, newer.sync_id);
        assert_eq!(repo.sync_runs().await.len(), 2);
    }

    #[tokio::test]
    async fn test_mock_repository_reports_unreachable() {
        let mut mock = MockCatalogRepository::new();
        mock.expect_ping().returning(|| false);

        assert!(!mock.ping().await);
    }
}
