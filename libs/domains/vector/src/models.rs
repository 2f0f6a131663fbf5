use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// Point payload: flat JSON object stored next to each vector
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// Distance metric for similarity calculations
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum DistanceMetric {
    #[default]
    #[strum(to_string = "cosine")]
    Cosine,
    #[strum(to_string = "euclid", serialize = "euclidean")]
    Euclid,
    #[strum(to_string = "dot", serialize = "dotproduct")]
    Dot,
    #[strum(to_string = "manhattan")]
    Manhattan,
}

impl DistanceMetric {
    /// Whether larger scores mean closer points
    pub fn higher_is_closer(&self) -> bool {
        matches!(self, DistanceMetric::Cosine | DistanceMetric::Dot)
    }
}

/// Vector collection configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VectorConfig {
    pub dimension: u64,
    pub distance: DistanceMetric,
}

impl VectorConfig {
    pub fn new(dimension: u64) -> Self {
        Self {
            dimension,
            distance: DistanceMetric::default(),
        }
    }

    pub fn with_distance(mut self, distance: DistanceMetric) -> Self {
        self.distance = distance;
        self
    }
}

/// Typed predicate over payload fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchFilter {
    /// Exact keyword match on a payload field
    Equals { field: String, value: String },
    /// Every sub-filter must hold
    And(Vec<SearchFilter>),
}

impl SearchFilter {
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        SearchFilter::Equals {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn and(filters: impl IntoIterator<Item = SearchFilter>) -> Self {
        SearchFilter::And(filters.into_iter().collect())
    }

    /// Evaluate against a payload
    pub fn matches(&self, payload: &Payload) -> bool {
        match self {
            SearchFilter::Equals { field, value } => payload
                .get(field)
                .and_then(|v| v.as_str())
                .is_some_and(|v| v == value),
            SearchFilter::And(filters) => filters.iter().all(|f| f.matches(payload)),
        }
    }
}

/// One ranked point returned by a similarity query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Product id as stored in the payload
    pub id: String,
    pub score: f32,
    pub payload: Payload,
}

impl SearchHit {
    /// String payload field, empty when missing or not a string
    pub fn field(&self, key: &str) -> String {
        self.payload
            .get(key)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    }
}

/// Collection summary for status reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CollectionStats {
    pub collection_name: String,
    pub points_count: u64,
    pub vector_size: u64,
    pub distance_metric: DistanceMetric,
}
