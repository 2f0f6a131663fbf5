use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

/// Rejections raised by the sync engine before any side effect
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SyncError {
    #[error("Batch size must be between 1 and {max}, got {requested}")]
    InvalidBatchSize { requested: usize, max: usize },
}

#[derive(Debug, Error)]
pub enum RecommenderError {
    #[error(transparent)]
    Sync(#[from] SyncError),

    /// A similarity query came back unsuccessful
    #[error("{0}")]
    NoResults(String),

    /// A text search came back unsuccessful
    #[error("{0}")]
    QueryFailed(String),
}

pub type RecommenderResult<T> = Result<T, RecommenderError>;

impl From<RecommenderError> for AppError {
    fn from(err: RecommenderError) -> Self {
        match err {
            RecommenderError::Sync(e) => AppError::BadRequest(e.to_string()),
            RecommenderError::NoResults(msg) => AppError::NotFound(msg),
            RecommenderError::QueryFailed(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for RecommenderError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
