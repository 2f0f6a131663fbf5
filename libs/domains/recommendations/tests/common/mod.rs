//! Shared fixtures for recommendations integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain_catalog::{
    CatalogRepository, CatalogResult, InMemoryCatalogRepository, ProductRecord, SyncRun,
};
use domain_recommendations::{RecommendationService, SyncService, SyncSettings};
use domain_vector::{
    CollectionStats, EmbeddingProvider, InMemoryVectorRepository, Payload, SearchFilter,
    SearchHit, VectorConfig, VectorError, VectorRepository, VectorResult,
};
use mockall::mock;

pub const DIMENSION: u32 = 64;
pub const COLLECTION: &str = "products_test";

/// Bag-of-words hashing embedder.
///
/// Same text, same vector; texts sharing words point the same way. Every
/// call is recorded so tests can assert batching.
#[derive(Default)]
pub struct HashEmbedder {
    calls: Mutex<Vec<Vec<String>>>,
}

impl HashEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vector_for(text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; DIMENSION as usize];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let mut hasher = DefaultHasher::new();
            token.to_lowercase().hash(&mut hasher);
            vector[(hasher.finish() % DIMENSION as u64) as usize] += 1.0;
        }
        vector
    }

    /// Batch sizes seen, in call order
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.calls.lock().unwrap().iter().map(Vec::len).collect()
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    fn model_name(&self) -> String {
        "hash-bow".to_string()
    }

    fn dimension(&self) -> u32 {
        DIMENSION
    }

    async fn embed(&self, documents: &[String]) -> VectorResult<Vec<Vec<f32>>> {
        self.calls.lock().unwrap().push(documents.to_vec());
        Ok(documents.iter().map(|d| Self::vector_for(d)).collect())
    }
}

/// Index wrapper whose upserts fail when a batch contains a poisoned id
pub struct FlakyIndex {
    pub inner: InMemoryVectorRepository,
    poisoned: HashSet<String>,
}

impl FlakyIndex {
    pub fn new(inner: InMemoryVectorRepository, poisoned: &[&str]) -> Self {
        Self {
            inner,
            poisoned: poisoned.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[async_trait]
impl VectorRepository for FlakyIndex {
    async fn ensure_collection(&self) -> VectorResult<bool> {
        self.inner.ensure_collection().await
    }

    async fn upsert_batch(
        &self,
        ids: Vec<String>,
        vectors: Vec<Vec<f32>>,
        payloads: Vec<Payload>,
    ) -> VectorResult<()> {
        if let Some(id) = ids.iter().find(|id| self.poisoned.contains(*id)) {
            return Err(VectorError::IndexWrite(format!("rejected point {id}")));
        }
        self.inner.upsert_batch(ids, vectors, payloads).await
    }

    async fn query_by_id(
        &self,
        id: &str,
        limit: u64,
        filter: Option<SearchFilter>,
    ) -> VectorResult<Vec<SearchHit>> {
        self.inner.query_by_id(id, limit, filter).await
    }

    async fn query_by_vector(
        &self,
        vector: Vec<f32>,
        limit: u64,
        filter: Option<SearchFilter>,
    ) -> VectorResult<Vec<SearchHit>> {
        self.inner.query_by_vector(vector, limit, filter).await
    }

    async fn collection_stats(&self) -> VectorResult<CollectionStats> {
        self.inner.collection_stats().await
    }

    async fn ping(&self) -> bool {
        true
    }
}

mock! {
    pub Catalog {}

    #[async_trait]
    impl CatalogRepository for Catalog {
        async fn fetch_stale_products(&self, limit: u64) -> CatalogResult<Vec<ProductRecord>>;
        async fn fetch_all_products(&self) -> CatalogResult<Vec<ProductRecord>>;
        async fn mark_indexed(&self, ids: &[String], at: DateTime<Utc>) -> CatalogResult<u64>;
        async fn append_sync_run(&self, run: &SyncRun) -> CatalogResult<()>;
        async fn fetch_last_sync_run(&self) -> CatalogResult<Option<SyncRun>>;
        async fn ping(&self) -> bool;
    }
}

mock! {
    pub Embedder {}

    #[async_trait]
    impl EmbeddingProvider for Embedder {
        fn model_name(&self) -> String;
        fn dimension(&self) -> u32;
        async fn embed(&self, documents: &[String]) -> VectorResult<Vec<Vec<f32>>>;
    }
}

/// Deterministic catalog rows
pub struct ProductFixture;

impl ProductFixture {
    pub fn id(n: usize) -> String {
        format!("p{n:04}")
    }

    /// Product `n`: categories cycle through three values, brands through two
    pub fn product(n: usize) -> ProductRecord {
        const CATEGORIES: [&str; 3] = ["Lighting", "Seating", "Storage"];
        const BRANDS: [&str; 2] = ["Lumen", "Oakline"];

        ProductRecord::new(
            Self::id(n),
            format!("Item{n} {}", CATEGORIES[n % 3]),
            CATEGORIES[n % 3],
            BRANDS[n % 2],
            format!("Kind{}", n % 4),
            format!("Description for item{n}"),
        )
    }

    pub fn products(count: usize) -> Vec<ProductRecord> {
        (0..count).map(Self::product).collect()
    }
}

pub fn vector_config() -> VectorConfig {
    VectorConfig::new(DIMENSION as u64)
}

pub fn memory_index() -> InMemoryVectorRepository {
    InMemoryVectorRepository::new(COLLECTION, vector_config())
}

/// In-memory stores wired into both services
pub struct Harness {
    pub catalog: InMemoryCatalogRepository,
    pub index: InMemoryVectorRepository,
    pub embedder: Arc<HashEmbedder>,
    pub sync: SyncService,
    pub recommendations: RecommendationService,
}

impl Harness {
    pub fn new(products: Vec<ProductRecord>) -> Self {
        Self::with_settings(products, SyncSettings::default())
    }

    pub fn with_settings(products: Vec<ProductRecord>, settings: SyncSettings) -> Self {
        let catalog = InMemoryCatalogRepository::with_products(products);
        let index = memory_index();
        let embedder = Arc::new(HashEmbedder::new());

        let sync = SyncService::new(
            Arc::new(catalog.clone()),
            Arc::new(index.clone()),
            embedder.clone(),
            settings,
        );
        let recommendations = RecommendationService::new(Arc::new(index.clone()), embedder.clone());

        Self {
            catalog,
            index,
            embedder,
            sync,
            recommendations,
        }
    }

    /// Index everything; panics unless the run succeeded
    pub async fn synced(products: Vec<ProductRecord>) -> Self {
        let harness = Self::new(products);
        let run = harness.sync.run_sync(100, true).await.unwrap();
        assert!(run.is_success(), "setup sync failed: {:?}", run.errors);
        harness
    }

    pub async fn indexed_count(&self) -> usize {
        self.catalog
            .products()
            .await
            .iter()
            .filter(|p| p.qdrant_indexed)
            .count()
    }
}
