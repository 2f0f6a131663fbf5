use std::time::Duration;

use async_trait::async_trait;
use core_config::{ConfigError, FromEnv, env_or_default, env_parse, env_required};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::EmbeddingProvider;
use crate::error::{VectorError, VectorResult};

/// OpenAI-compatible embeddings endpoint configuration
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub dimension: u32,
    pub timeout_secs: u64,
}

impl OpenAIConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "text-embedding-3-small".to_string(),
            dimension: 1536,
            timeout_secs: 30,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>, dimension: u32) -> Self {
        self.model = model.into();
        self.dimension = dimension;
        self
    }

    /// The v3 models accept a `dimensions` override; older ones reject it.
    fn sends_dimensions(&self) -> bool {
        self.model.starts_with("text-embedding-3")
    }
}

impl FromEnv for OpenAIConfig {
    /// - OPENAI_API_KEY: required
    /// - OPENAI_BASE_URL: defaults to https://api.openai.com/v1
    /// - EMBEDDING_MODEL: defaults to text-embedding-3-small
    /// - EMBEDDING_DIMENSION: defaults to 1536
    /// - EMBEDDING_TIMEOUT_SECS: defaults to 30
    fn from_env() -> Result<Self, ConfigError> {
        let dimension = env_parse("EMBEDDING_DIMENSION", 1536u32)?;
        if dimension == 0 {
            return Err(ConfigError::Invalid(
                "EMBEDDING_DIMENSION must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            api_key: env_required("OPENAI_API_KEY")?,
            base_url: env_or_default("OPENAI_BASE_URL", "https://api.openai.com/v1")
                .trim_end_matches('/')
                .to_string(),
            model: env_or_default("EMBEDDING_MODEL", "text-embedding-3-small"),
            dimension,
            timeout_secs: env_parse("EMBEDDING_TIMEOUT_SECS", 30u64)?,
        })
    }
}

/// OpenAI embeddings provider
pub struct OpenAIProvider {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIProvider {
    pub fn new(config: OpenAIConfig) -> VectorResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

/// Reorder by `index` and check count and width against the request
fn into_ordered_vectors(
    mut data: Vec<EmbeddingData>,
    expected: usize,
    dimension: u32,
) -> VectorResult<Vec<Vec<f32>>> {
    if data.len() != expected {
        return Err(VectorError::Embedding(format!(
            "Expected {} embeddings, got {}",
            expected,
            data.len()
        )));
    }

    data.sort_by_key(|d| d.index);

    if data.iter().enumerate().any(|(i, d)| d.index != i) {
        return Err(VectorError::Embedding(
            "Embedding indices are not a permutation of the input".to_string(),
        ));
    }

    if let Some(bad) = data.iter().find(|d| d.embedding.len() != dimension as usize) {
        return Err(VectorError::Embedding(format!(
            "Expected {}-dimensional embeddings, got {}",
            dimension,
            bad.embedding.len()
        )));
    }

    Ok(data.into_iter().map(|d| d.embedding).collect())
}

#[async_trait]
impl EmbeddingProvider for OpenAIProvider {
    fn model_name(&self) -> String {
        self.config.model.clone()
    }

    fn dimension(&self) -> u32 {
        self.config.dimension
    }

    async fn embed(&self, documents: &[String]) -> VectorResult<Vec<Vec<f32>>> {
        if documents.is_empty() {
            return Ok(vec![]);
        }

        let request = EmbeddingRequest {
            model: &self.config.model,
            input: documents,
            dimensions: self
                .config
                .sends_dimensions()
                .then_some(self.config.dimension),
        };

        let response = self
            .client
            .post(format!("{}/embeddings", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(VectorError::Embedding(format!(
                "Embedding API error ({}): {}",
                status, error_text
            )));
        }

        let body: EmbeddingResponse = response.json().await?;
        let vectors = into_ordered_vectors(body.data, documents.len(), self.config.dimension)?;

        tracing::debug!(
            model = %self.config.model,
            count = vectors.len(),
            "Generated embeddings"
        );
        Ok(vectors)
    }
}
