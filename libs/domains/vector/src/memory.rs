//! Brute-force in-process index for development and tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{VectorError, VectorResult};
use crate::models::{CollectionStats, DistanceMetric, Payload, SearchFilter, SearchHit, VectorConfig};
use crate::repository::{VectorRepository, check_parallel_lengths};

#[derive(Debug, Clone)]
struct Collection {
    config: VectorConfig,
    points: HashMap<String, (Vec<f32>, Payload)>,
}

/// In-memory implementation of VectorRepository
///
/// Upserts replace by id and queries rank every stored point. A by-id query
/// ranks the reference point like any other, so it usually comes back first.
#[derive(Debug, Clone)]
pub struct InMemoryVectorRepository {
    collection_name: String,
    config: VectorConfig,
    collection: Arc<RwLock<Option<Collection>>>,
}

impl InMemoryVectorRepository {
    pub fn new(collection_name: impl Into<String>, config: VectorConfig) -> Self {
        Self {
            collection_name: collection_name.into(),
            config,
            collection: Arc::default(),
        }
    }

    /// Start with a collection that already exists under `existing` settings
    pub fn with_existing_collection(
        collection_name: impl Into<String>,
        config: VectorConfig,
        existing: VectorConfig,
    ) -> Self {
        Self {
            collection_name: collection_name.into(),
            config,
            collection: Arc::new(RwLock::new(Some(Collection {
                config: existing,
                points: HashMap::new(),
            }))),
        }
    }

    pub async fn point_count(&self) -> usize {
        self.collection
            .read()
            .await
            .as_ref()
            .map(|c| c.points.len())
            .unwrap_or(0)
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.collection
            .read()
            .await
            .as_ref()
            .is_some_and(|c| c.points.contains_key(id))
    }

    pub async fn payload(&self, id: &str) -> Option<Payload> {
        self.collection
            .read()
            .await
            .as_ref()
            .and_then(|c| c.points.get(id).map(|(_, p)| p.clone()))
    }

    fn rank(
        collection: &Collection,
        query: &[f32],
        limit: u64,
        filter: Option<&SearchFilter>,
    ) -> Vec<SearchHit> {
        let metric = collection.config.distance;
        let mut hits: Vec<SearchHit> = collection
            .points
            .iter()
            .filter(|(_, (_, payload))| filter.is_none_or(|f| f.matches(payload)))
            .map(|(id, (vector, payload))| SearchHit {
                id: id.clone(),
                score: score(metric, query, vector),
                payload: payload.clone(),
            })
            .collect();

        hits.sort_by(|a, b| {
            let ord = if metric.higher_is_closer() {
                b.score.total_cmp(&a.score)
            } else {
                a.score.total_cmp(&b.score)
            };
            ord.then_with(|| a.id.cmp(&b.id))
        });
        hits.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        hits
    }
}

fn score(metric: DistanceMetric, a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    match metric {
        DistanceMetric::Cosine => {
            let na = a.iter().map(|x| x * x).sum::<f32>().sqrt();
            let nb = b.iter().map(|x| x * x).sum::<f32>().sqrt();
            if na == 0.0 || nb == 0.0 {
                0.0
            } else {
                dot / (na * nb)
            }
        }
        DistanceMetric::Dot => dot,
        DistanceMetric::Euclid => a
            .iter()
            .zip(b)
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f32>()
            .sqrt(),
        DistanceMetric::Manhattan => a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum(),
    }
}

#[async_trait]
impl VectorRepository for InMemoryVectorRepository {
    async fn ensure_collection(&self) -> VectorResult<bool> {
        let mut slot = self.collection.write().await;

        match slot.as_ref() {
            Some(existing) if existing.config.dimension != self.config.dimension => {
                Err(VectorError::Config(format!(
                    "Collection '{}' has vector size {}, expected {}",
                    self.collection_name, existing.config.dimension, self.config.dimension
                )))
            }
            Some(_) => Ok(false),
            None => {
                *slot = Some(Collection {
                    config: self.config,
                    points: HashMap::new(),
                });
                tracing::info!(collection = %self.collection_name, "Created in-memory collection");
                Ok(true)
            }
        }
    }

    async fn upsert_batch(
        &self,
        ids: Vec<String>,
        vectors: Vec<Vec<f32>>,
        payloads: Vec<Payload>,
    ) -> VectorResult<()> {
        check_parallel_lengths(&ids, &vectors, &payloads)?;

        let mut slot = self.collection.write().await;
        let collection = slot.as_mut().ok_or_else(|| {
            VectorError::IndexWrite(format!("Collection '{}' not found", self.collection_name))
        })?;

        let dimension = collection.config.dimension;
        if let Some(bad) = vectors.iter().find(|v| v.len() as u64 != dimension) {
            return Err(VectorError::IndexWrite(format!(
                "Vector dimension error: expected {}, got {}",
                dimension,
                bad.len()
            )));
        }

        for ((id, vector), payload) in ids.into_iter().zip(vectors).zip(payloads) {
            collection.points.insert(id, (vector, payload));
        }
        Ok(())
    }

    async fn query_by_id(
        &self,
        id: &str,
        limit: u64,
        filter: Option<SearchFilter>,
    ) -> VectorResult<Vec<SearchHit>> {
        let slot = self.collection.read().await;
        let collection = slot.as_ref().ok_or_else(|| {
            VectorError::IndexQuery(format!("Collection '{}' not found", self.collection_name))
        })?;

        let (reference, _) = collection
            .points
            .get(id)
            .ok_or_else(|| VectorError::IndexQuery(format!("No point with id {id} found")))?;

        Ok(Self::rank(collection, reference, limit, filter.as_ref()))
    }

    async fn query_by_vector(
        &self,
        vector: Vec<f32>,
        limit: u64,
        filter: Option<SearchFilter>,
    ) -> VectorResult<Vec<SearchHit>> {
        let slot = self.collection.read().await;
        let collection = slot.as_ref().ok_or_else(|| {
            VectorError::IndexQuery(format!("Collection '{}' not found", self.collection_name))
        })?;

        if vector.len() as u64 != collection.config.dimension {
            return Err(VectorError::IndexQuery(format!(
                "Query vector dimension error: expected {}, got {}",
                collection.config.dimension,
                vector.len()
            )));
        }

        Ok(Self::rank(collection, &vector, limit, filter.as_ref()))
    }

    async fn collection_stats(&self) -> VectorResult<CollectionStats> {
        let slot = self.collection.read().await;
        let collection = slot.as_ref().ok_or_else(|| {
            VectorError::IndexQuery(format!("Collection '{}' not found", self.collection_name))
        })?;

        Ok(CollectionStats {
            collection_name: self.collection_name.clone(),
            points_count: collection.points.len() as u64,
            vector_size: collection.config.dimension,
            distance_metric: collection.config.distance,
        })
    }

    async fn ping(&self) -> bool {
        true
    }
}
