use chrono::{DateTime, Utc};
use domain_catalog::{SyncRun, SyncStatus};
use domain_vector::{CollectionStats, SearchHit};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// One similar product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecommendationHit {
    pub product_id: String,
    pub name: String,
    pub category: String,
    pub brand: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub description: String,
    pub similarity_score: f32,
}

impl From<SearchHit> for RecommendationHit {
    fn from(hit: SearchHit) -> Self {
        Self {
            name: hit.field("name"),
            category: hit.field("category"),
            brand: hit.field("brand"),
            product_type: hit.field("type"),
            description: hit.field("description"),
            similarity_score: hit.score,
            product_id: hit.id,
        }
    }
}

/// What a query was anchored on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryReference {
    Product(String),
    Products(Vec<String>),
    Text(String),
}

/// Normalized result of every similarity query.
///
/// Failures are carried in `success`/`message`; `reference` is `None` and
/// the list is empty in that case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationList {
    pub success: bool,
    pub message: String,
    pub reference: Option<QueryReference>,
    pub recommendations: Vec<RecommendationHit>,
    pub total_found: usize,
}

impl RecommendationList {
    pub fn found(
        message: String,
        reference: QueryReference,
        recommendations: Vec<RecommendationHit>,
    ) -> Self {
        Self {
            success: true,
            message,
            reference: Some(reference),
            total_found: recommendations.len(),
            recommendations,
        }
    }

    pub fn failed(message: String) -> Self {
        Self {
            success: false,
            message,
            reference: None,
            recommendations: Vec::new(),
            total_found: 0,
        }
    }
}

fn default_limit() -> u64 {
    10
}

/// Product ids were integers in older catalogs; accept both shapes.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(u64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

fn strings_or_numbers<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapped(#[serde(deserialize_with = "string_or_number")] String);

    Ok(Vec::<Wrapped>::deserialize(deserializer)?
        .into_iter()
        .map(|w| w.0)
        .collect())
}

// ===== Admin =====

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct SyncRequest {
    /// Products per embedding/upsert batch; server default when omitted
    pub batch_size: Option<usize>,
    /// Re-embed every product, not just unindexed ones
    #[serde(default)]
    pub force_reindex: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SyncResponse {
    pub success: bool,
    pub message: String,
    pub sync_id: Uuid,
    pub status: SyncStatus,
    pub total_products: u32,
    pub processed_products: u32,
    pub failed_products: u32,
    pub batch_size: u32,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub duration_seconds: Option<f64>,
    pub errors: Vec<String>,
}

impl From<SyncRun> for SyncResponse {
    fn from(run: SyncRun) -> Self {
        Self {
            success: run.succeeded(),
            message: run.summary(),
            sync_id: run.sync_id,
            status: run.status,
            total_products: run.total_products,
            processed_products: run.processed_products,
            failed_products: run.failed_products,
            batch_size: run.batch_size,
            started_at: run.started_at,
            completed_at: run.completed_at,
            duration_seconds: run.duration_seconds,
            errors: run.errors,
        }
    }
}

/// Collection stats, or the reason they could not be read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum CollectionInfo {
    Stats(CollectionStats),
    Unavailable { error: String },
}

impl<E: std::fmt::Display> From<Result<CollectionStats, E>> for CollectionInfo {
    fn from(result: Result<CollectionStats, E>) -> Self {
        match result {
            Ok(stats) => CollectionInfo::Stats(stats),
            Err(e) => CollectionInfo::Unavailable {
                error: e.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SyncStatusResponse {
    pub last_sync: Option<SyncRun>,
    pub collection_info: CollectionInfo,
    pub database_status: bool,
    pub qdrant_status: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ConnectionTestResponse {
    pub postgres_status: bool,
    pub qdrant_status: bool,
    pub postgres_message: String,
    pub qdrant_message: String,
}

// ===== Products =====

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SimilarProductsRequest {
    /// Reference product id
    #[serde(deserialize_with = "string_or_number")]
    #[validate(length(min = 1))]
    pub product_id: String,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 50))]
    pub limit: u64,
    pub category_filter: Option<String>,
    pub brand_filter: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SimilarProductsListRequest {
    /// Reference product ids, queried in order
    #[serde(deserialize_with = "strings_or_numbers")]
    #[validate(length(min = 1))]
    pub product_ids: Vec<String>,
    /// Per reference product
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 50))]
    pub limit: u64,
    pub category_filter: Option<String>,
    pub brand_filter: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SemanticQueryRequest {
    #[validate(length(min = 1))]
    pub query: String,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 50))]
    pub limit: u64,
    pub category_filter: Option<String>,
    pub brand_filter: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SimilarProductsResponse {
    pub success: bool,
    pub message: String,
    pub reference_product: Option<String>,
    pub similar_products: Vec<RecommendationHit>,
    pub total_found: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SimilarProductsListResponse {
    pub success: bool,
    pub message: String,
    pub reference_products: Vec<String>,
    pub similar_products: Vec<RecommendationHit>,
    pub total_found: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SemanticQueryResponse {
    pub success: bool,
    pub message: String,
    pub query: String,
    pub recommendations: Vec<RecommendationHit>,
    pub total_found: usize,
}
