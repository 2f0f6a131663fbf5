use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt sync history row {sync_id}: {reason}")]
    CorruptRecord { sync_id: String, reason: String },
}

pub type CatalogResult<T> = Result<T, CatalogError>;
