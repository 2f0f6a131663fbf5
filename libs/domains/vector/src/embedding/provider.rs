use async_trait::async_trait;

use crate::error::VectorResult;

/// Text → vector generation.
///
/// `embed` returns one vector per input, in input order, each of
/// `dimension()` components. Empty input yields empty output.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    fn model_name(&self) -> String;

    fn dimension(&self) -> u32;

    async fn embed(&self, documents: &[String]) -> VectorResult<Vec<Vec<f32>>>;
}
