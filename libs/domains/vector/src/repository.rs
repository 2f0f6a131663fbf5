use async_trait::async_trait;

use crate::error::VectorResult;
use crate::models::{CollectionStats, Payload, SearchFilter, SearchHit};

/// Repository trait for the product vector index
///
/// Points are addressed by product id strings; implementations map them to
/// whatever identifier the backing store needs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VectorRepository: Send + Sync {
    /// Create the collection when missing.
    ///
    /// Returns `true` when it was created. An existing collection whose
    /// vector size differs from the configured one is a [`crate::VectorError::Config`].
    async fn ensure_collection(&self) -> VectorResult<bool>;

    /// Insert or replace points by id.
    ///
    /// `ids`, `vectors` and `payloads` are parallel; unequal lengths fail
    /// with [`crate::VectorError::ArgumentMismatch`] before any I/O.
    async fn upsert_batch(
        &self,
        ids: Vec<String>,
        vectors: Vec<Vec<f32>>,
        payloads: Vec<Payload>,
    ) -> VectorResult<()>;

    /// Nearest neighbours of an already indexed point
    async fn query_by_id(
        &self,
        id: &str,
        limit: u64,
        filter: Option<SearchFilter>,
    ) -> VectorResult<Vec<SearchHit>>;

    /// Nearest neighbours of a raw vector
    async fn query_by_vector(
        &self,
        vector: Vec<f32>,
        limit: u64,
        filter: Option<SearchFilter>,
    ) -> VectorResult<Vec<SearchHit>>;

    async fn collection_stats(&self) -> VectorResult<CollectionStats>;

    /// Cheap reachability check
    async fn ping(&self) -> bool;
}

/// Length check shared by every implementation of `upsert_batch`
pub fn check_parallel_lengths(
    ids: &[String],
    vectors: &[Vec<f32>],
    payloads: &[Payload],
) -> VectorResult<()> {
    if ids.len() == vectors.len() && ids.len() == payloads.len() {
        Ok(())
    } else {
        Err(crate::error::VectorError::ArgumentMismatch {
            ids: ids.len(),
            vectors: vectors.len(),
            payloads: payloads.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VectorError;

    #[test]
    fn test_parallel_lengths() {
        let ids = vec!["a".to_string(), "b".to_string()];
        let vectors = vec![vec![0.0], vec![1.0]];
        let payloads = vec![Payload::new(), Payload::new()];
        assert!(check_parallel_lengths(&ids, &vectors, &payloads).is_ok());

        let err = check_parallel_lengths(&ids, &vectors[..1], &payloads).unwrap_err();
        assert!(matches!(
            err,
            VectorError::ArgumentMismatch {
                ids: 2,
                vectors: 1,
                payloads: 2
            }
        ));
    }

    #[tokio::test]
    async fn test_mock_repository_query_failure() {
        let mut mock = MockVectorRepository::new();
        mock.expect_query_by_id()
            .returning(|_, _, _| Err(VectorError::IndexQuery("point not found".into())));

        let err = mock.query_by_id("404", 5, None).await.unwrap_err();
        assert!(err.to_string().contains("point not found"));
    }
}
