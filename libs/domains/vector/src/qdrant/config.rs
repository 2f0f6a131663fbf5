use core_config::{ConfigError, FromEnv, env_or_default, env_parse};

use crate::models::DistanceMetric;

/// Qdrant connection and collection configuration
#[derive(Debug, Clone)]
pub struct QdrantConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub collection_name: String,
    pub distance: DistanceMetric,
}

impl QdrantConfig {
    pub fn new(url: String) -> Self {
        Self {
            url,
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: String) -> Self {
        self.api_key = Some(api_key);
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_collection(mut self, name: impl Into<String>) -> Self {
        self.collection_name = name.into();
        self
    }
}

impl FromEnv for QdrantConfig {
    /// - QDRANT_URL: gRPC endpoint, defaults to http://localhost:6334
    /// - QDRANT_API_KEY: optional, blank counts as unset
    /// - QDRANT_TIMEOUT_SECS: defaults to 30
    /// - COLLECTION_NAME: defaults to products_new
    /// - QDRANT_DISTANCE: cosine | euclid | dot | manhattan
    fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("QDRANT_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        Ok(Self {
            url: env_or_default("QDRANT_URL", "http://localhost:6334"),
            api_key,
            timeout_secs: env_parse("QDRANT_TIMEOUT_SECS", 30u64)?,
            collection_name: env_or_default("COLLECTION_NAME", "products_new"),
            distance: env_parse("QDRANT_DISTANCE", DistanceMetric::Cosine)?,
        })
    }
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:6334".to_string(),
            api_key: None,
            timeout_secs: 30,
            collection_name: "products_new".to_string(),
            distance: DistanceMetric::Cosine,
        }
    }
}
