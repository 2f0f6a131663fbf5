use std::sync::Arc;
use std::time::Instant;

use domain_vector::{
    EmbeddingProvider, SearchFilter, SearchHit, VectorError, VectorRepository, VectorResult,
};
use observability::QueryMetrics;

use crate::models::{QueryReference, RecommendationHit, RecommendationList};

/// Predicate shared by every query: exact match on `category` and/or
/// `brand`, conjunctive when both are given.
pub fn build_filter(category: Option<&str>, brand: Option<&str>) -> Option<SearchFilter> {
    let mut conditions: Vec<SearchFilter> = [("category", category), ("brand", brand)]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| SearchFilter::equals(field, v)))
        .collect();

    match conditions.len() {
        0 => None,
        1 => conditions.pop(),
        _ => Some(SearchFilter::and(conditions)),
    }
}

/// Similarity queries over the vector index.
///
/// Every operation returns a [`RecommendationList`]; adapter and embedding
/// errors become unsuccessful lists instead of propagating.
#[derive(Clone)]
pub struct RecommendationService {
    index: Arc<dyn VectorRepository>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl RecommendationService {
    pub fn new(index: Arc<dyn VectorRepository>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { index, embedder }
    }

    /// Products nearest to `product_id`'s stored vector.
    ///
    /// The reference product is never part of its own result.
    #[tracing::instrument(skip(self))]
    pub async fn find_similar_by_id(
        &self,
        product_id: &str,
        limit: u64,
        category: Option<&str>,
        brand: Option<&str>,
    ) -> RecommendationList {
        let started = Instant::now();
        let filter = build_filter(category, brand);

        let list = match self.neighbours_of(product_id, limit, filter).await {
            Ok(hits) => RecommendationList::found(
                format!("Found {} similar products", hits.len()),
                QueryReference::Product(product_id.to_string()),
                hits,
            ),
            Err(e) => {
                tracing::error!(error = %e, "Error getting similar products");
                RecommendationList::failed(format!("Error retrieving similar products: {e}"))
            }
        };

        record("by_id", &list, started);
        list
    }

    /// Per-reference results concatenated in input order.
    ///
    /// No re-ranking and no de-duplication across references: a product
    /// similar to two references appears twice.
    #[tracing::instrument(skip(self, product_ids), fields(references = product_ids.len()))]
    pub async fn find_similar_by_id_list(
        &self,
        product_ids: &[String],
        limit: u64,
        category: Option<&str>,
        brand: Option<&str>,
    ) -> RecommendationList {
        let started = Instant::now();
        let filter = build_filter(category, brand);

        let mut all = Vec::new();
        let mut failure = None;
        for product_id in product_ids {
            match self.neighbours_of(product_id, limit, filter.clone()).await {
                Ok(hits) => all.extend(hits),
                Err(e) => {
                    tracing::error!(product_id = %product_id, error = %e, "Error getting similar products");
                    failure = Some(e);
                    break;
                }
            }
        }

        let list = match failure {
            None => RecommendationList::found(
                format!("Found {} similar products", all.len()),
                QueryReference::Products(product_ids.to_vec()),
                all,
            ),
            Some(e) => {
                RecommendationList::failed(format!("Error retrieving similar products: {e}"))
            }
        };

        record("by_id_list", &list, started);
        list
    }

    /// Products nearest to the embedding of free text
    #[tracing::instrument(skip(self))]
    pub async fn find_similar_by_text(
        &self,
        text: &str,
        limit: u64,
        category: Option<&str>,
        brand: Option<&str>,
    ) -> RecommendationList {
        let started = Instant::now();
        let filter = build_filter(category, brand);

        let list = match self.nearest_to_text(text, limit, filter).await {
            Ok(hits) => RecommendationList::found(
                format!("Found {} recommendations", hits.len()),
                QueryReference::Text(text.to_string()),
                hits,
            ),
            Err(e) => {
                tracing::error!(error = %e, "Error getting semantic recommendations");
                RecommendationList::failed(format!("Error retrieving recommendations: {e}"))
            }
        };

        record("by_text", &list, started);
        list
    }

    pub fn model_name(&self) -> String {
        self.embedder.model_name()
    }

    async fn neighbours_of(
        &self,
        product_id: &str,
        limit: u64,
        filter: Option<SearchFilter>,
    ) -> VectorResult<Vec<RecommendationHit>> {
        let hits = self
            .index
            .query_by_id(product_id, limit.saturating_add(1), filter)
            .await?;

        Ok(exclude_reference(hits, product_id, limit))
    }

    async fn nearest_to_text(
        &self,
        text: &str,
        limit: u64,
        filter: Option<SearchFilter>,
    ) -> VectorResult<Vec<RecommendationHit>> {
        let vector = self
            .embedder
            .embed(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| VectorError::Embedding("No embedding returned for query".into()))?;

        let hits = self.index.query_by_vector(vector, limit, filter).await?;
        Ok(hits.into_iter().map(RecommendationHit::from).collect())
    }
}

fn exclude_reference(hits: Vec<SearchHit>, reference: &str, limit: u64) -> Vec<RecommendationHit> {
    hits.into_iter()
        .filter(|hit| hit.id != reference)
        .take(usize::try_from(limit).unwrap_or(usize::MAX))
        .map(RecommendationHit::from)
        .collect()
}

fn record(kind: &str, list: &RecommendationList, started: Instant) {
    QueryMetrics::record_query(
        kind,
        list.success,
        list.total_found,
        started.elapsed().as_secs_f64(),
    );
}
