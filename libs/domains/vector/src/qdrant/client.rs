use std::time::Duration;

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    self, CreateCollectionBuilder, PointStruct, Query, QueryPointsBuilder, ScoredPoint,
    UpsertPointsBuilder, VectorInput, VectorParamsBuilder,
};

use super::QdrantConfig;
use super::convert::{
    from_qdrant_distance, payload_from_qdrant, payload_to_qdrant, point_id, point_id_to_string,
    to_qdrant_distance, to_qdrant_filter,
};
use crate::error::{VectorError, VectorResult};
use crate::models::{CollectionStats, DistanceMetric, Payload, SearchFilter, SearchHit};
use crate::repository::{VectorRepository, check_parallel_lengths};

/// Qdrant-backed implementation of VectorRepository
pub struct QdrantRepository {
    client: Qdrant,
    collection_name: String,
    dimension: u64,
    distance: DistanceMetric,
}

impl QdrantRepository {
    /// Build the client. No network traffic happens until the first call.
    pub fn new(config: QdrantConfig, dimension: u64) -> VectorResult<Self> {
        let mut builder = Qdrant::from_url(&config.url);

        if let Some(api_key) = config.api_key {
            builder = builder.api_key(api_key);
        }

        builder = builder.timeout(Duration::from_secs(config.timeout_secs));

        let client = builder
            .build()
            .map_err(|e| VectorError::Qdrant(format!("Failed to build client: {}", e)))?;

        Ok(Self {
            client,
            collection_name: config.collection_name,
            dimension,
            distance: config.distance,
        })
    }

    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    fn to_hit(point: ScoredPoint) -> SearchHit {
        let payload = payload_from_qdrant(point.payload);
        let id = payload
            .get("product_id")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .or_else(|| point.id.as_ref().and_then(point_id_to_string))
            .unwrap_or_default();

        SearchHit {
            id,
            score: point.score,
            payload,
        }
    }

    async fn query(
        &self,
        query: Query,
        limit: u64,
        filter: Option<SearchFilter>,
    ) -> VectorResult<Vec<SearchHit>> {
        let mut builder = QueryPointsBuilder::new(&self.collection_name)
            .query(query)
            .limit(limit)
            .with_payload(true);

        if let Some(filter) = filter.as_ref() {
            builder = builder.filter(to_qdrant_filter(filter));
        }

        let response = self
            .client
            .query(builder)
            .await
            .map_err(|e| VectorError::IndexQuery(e.to_string()))?;

        Ok(response.result.into_iter().map(Self::to_hit).collect())
    }

    /// Stored (size, distance) of the single unnamed vector
    fn vector_params(info: &qdrant::CollectionInfo) -> Option<(u64, DistanceMetric)> {
        let vectors_config = info.config.as_ref()?.params.as_ref()?.vectors_config.as_ref()?;
        match vectors_config.config.as_ref()? {
            qdrant::vectors_config::Config::Params(p) => {
                Some((p.size, from_qdrant_distance(p.distance())))
            }
            qdrant::vectors_config::Config::ParamsMap(map) => map
                .map
                .values()
                .next()
                .map(|p| (p.size, from_qdrant_distance(p.distance()))),
        }
    }

    async fn collection_info(&self) -> VectorResult<qdrant::CollectionInfo> {
        self.client
            .collection_info(&self.collection_name)
            .await?
            .result
            .ok_or_else(|| VectorError::Qdrant("Collection info missing result".to_string()))
    }
}

#[async_trait]
impl VectorRepository for QdrantRepository {
    async fn ensure_collection(&self) -> VectorResult<bool> {
        if self.client.collection_exists(&self.collection_name).await? {
            let info = self.collection_info().await?;
            if let Some((size, _)) = Self::vector_params(&info) {
                if size != self.dimension {
                    return Err(VectorError::Config(format!(
                        "Collection '{}' has vector size {}, embedding model produces {}",
                        self.collection_name, size, self.dimension
                    )));
                }
            }
            tracing::debug!(collection = %self.collection_name, "Collection already exists");
            return Ok(false);
        }

        tracing::info!(
            collection = %self.collection_name,
            dimension = self.dimension,
            distance = %self.distance,
            "Creating collection"
        );

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection_name).vectors_config(
                    VectorParamsBuilder::new(self.dimension, to_qdrant_distance(self.distance)),
                ),
            )
            .await?;

        Ok(true)
    }

    async fn upsert_batch(
        &self,
        ids: Vec<String>,
        vectors: Vec<Vec<f32>>,
        payloads: Vec<Payload>,
    ) -> VectorResult<()> {
        check_parallel_lengths(&ids, &vectors, &payloads)?;

        if ids.is_empty() {
            return Ok(());
        }

        let count = ids.len();
        let points: Vec<PointStruct> = ids
            .iter()
            .zip(vectors)
            .zip(payloads)
            .map(|((id, vector), payload)| {
                PointStruct::new(point_id(id), vector, payload_to_qdrant(payload))
            })
            .collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection_name, points).wait(true))
            .await
            .map_err(|e| VectorError::IndexWrite(e.to_string()))?;

        tracing::debug!(collection = %self.collection_name, count, "Upserted points");
        Ok(())
    }

    async fn query_by_id(
        &self,
        id: &str,
        limit: u64,
        filter: Option<SearchFilter>,
    ) -> VectorResult<Vec<SearchHit>> {
        let query = Query::new_nearest(VectorInput::new_id(point_id(id)));
        self.query(query, limit, filter).await
    }

    async fn query_by_vector(
        &self,
        vector: Vec<f32>,
        limit: u64,
        filter: Option<SearchFilter>,
    ) -> VectorResult<Vec<SearchHit>> {
        self.query(Query::new_nearest(vector), limit, filter).await
    }

    async fn collection_stats(&self) -> VectorResult<CollectionStats> {
        let info = self.collection_info().await?;
        let (vector_size, distance_metric) =
            Self::vector_params(&info).unwrap_or((self.dimension, self.distance));

        Ok(CollectionStats {
            collection_name: self.collection_name.clone(),
            points_count: info.points_count.unwrap_or(0),
            vector_size,
            distance_metric,
        })
    }

    async fn ping(&self) -> bool {
        match self.client.health_check().await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Qdrant health check failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qdrant_client::qdrant::{PointId, Value as QdrantValue};
    use std::collections::HashMap;

    fn scored(id: PointId, payload: HashMap<String, QdrantValue>, score: f32) -> ScoredPoint {
        ScoredPoint {
            id: Some(id),
            payload,
            score,
            ..Default::default()
        }
    }

    #[test]
    fn test_hit_prefers_payload_product_id() {
        let mut payload = HashMap::new();
        payload.insert("product_id".to_string(), QdrantValue::from("SKU-9".to_string()));
        payload.insert("name".to_string(), QdrantValue::from("Lamp".to_string()));

        let hit = QdrantRepository::to_hit(scored(point_id("SKU-9"), payload, 0.87));
        assert_eq!(hit.id, "SKU-9");
        assert_eq!(hit.field("name"), "Lamp");
        assert!((hit.score - 0.87).abs() < f32::EPSILON);
    }

    #[test]
    fn test_hit_falls_back_to_point_id() {
        let hit = QdrantRepository::to_hit(scored(PointId::from(77u64), HashMap::new(), 0.5));
        assert_eq!(hit.id, "77");
    }

    #[tokio::test]
    async fn test_new_builds_lazily() {
        let repo = QdrantRepository::new(QdrantConfig::default(), 1536).unwrap();
        assert_eq!(repo.collection_name(), "products_new");
    }
}
