use crate::error::CatalogError;
use crate::models::{SyncRun, SyncStatus};
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::{NotSet, Set};
use serde::{Deserialize, Serialize};

/// Sea-ORM Entity for the sync_history ledger
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sync_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub sync_id: Uuid,
    pub started_at: DateTimeWithTimeZone,
    pub completed_at: Option<DateTimeWithTimeZone>,
    pub duration_seconds: Option<f64>,
    pub total_products: i32,
    pub processed_products: i32,
    pub failed_products: i32,
    pub status: SyncStatus,
    pub batch_size: i32,
    pub errors: Json,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn to_db_count(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn from_db_count(value: i32, field: &str, sync_id: Uuid) -> Result<u32, CatalogError> {
    u32::try_from(value).map_err(|_| CatalogError::CorruptRecord {
        sync_id: sync_id.to_string(),
        reason: format!("negative {field}: {value}"),
    })
}

impl TryFrom<Model> for SyncRun {
    type Error = CatalogError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let errors: Vec<String> = serde_json::from_value(model.errors).unwrap_or_default();

        Ok(Self {
            sync_id: model.sync_id,
            started_at: model.started_at.into(),
            completed_at: model.completed_at.map(Into::into),
            duration_seconds: model.duration_seconds,
            total_products: from_db_count(model.total_products, "total_products", model.sync_id)?,
            processed_products: from_db_count(
                model.processed_products,
                "processed_products",
                model.sync_id,
            )?,
            failed_products: from_db_count(model.failed_products, "failed_products", model.sync_id)?,
            status: model.status,
            batch_size: from_db_count(model.batch_size, "batch_size", model.sync_id)?,
            errors,
        })
    }
}

impl TryFrom<&SyncRun> for ActiveModel {
    type Error = CatalogError;

    fn try_from(run: &SyncRun) -> Result<Self, Self::Error> {
        Ok(ActiveModel {
            id: NotSet,
            sync_id: Set(run.sync_id),
            started_at: Set(run.started_at.into()),
            completed_at: Set(run.completed_at.map(Into::into)),
            duration_seconds: Set(run.duration_seconds),
            total_products: Set(to_db_count(run.total_products)),
            processed_products: Set(to_db_count(run.processed_products)),
            failed_products: Set(to_db_count(run.failed_products)),
            status: Set(run.status),
            batch_size: Set(to_db_count(run.batch_size)),
            errors: Set(serde_json::to_value(&run.errors)?),
            created_at: Set(chrono::Utc::now().into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_for(run: &SyncRun) -> Model {
        Model {
            id: 1,
            sync_id: run.sync_id,
            started_at: run.started_at.into(),
            completed_at: run.completed_at.map(Into::into),
            duration_seconds: run.duration_seconds,
            total_products: run.total_products as i32,
            processed_products: run.processed_products as i32,
            failed_products: run.failed_products as i32,
            status: run.status,
            batch_size: run.batch_size as i32,
            errors: serde_json::json!(run.errors),
            created_at: run.started_at.into(),
        }
    }

    #[test]
    fn test_model_converts_to_run() {
        let mut run = SyncRun::start(50);
        run.total_products = 4;
        run.processed_products = 2;
        run.failed_products = 2;
        run.record_error("batch 2 failed: timeout");
        run.complete();

        let restored = SyncRun::try_from(model_for(&run)).unwrap();
        assert_eq!(restored, run);
    }

    #[test]
    fn test_negative_counter_is_corrupt() {
        let run = SyncRun::start(10);
        let mut model = model_for(&run);
        model.failed_products = -1;

        let err = SyncRun::try_from(model).unwrap_err();
        assert!(matches!(err, CatalogError::CorruptRecord { .. }));
    }

    #[test]
    fn test_unreadable_errors_column_becomes_empty() {
        let run = SyncRun::start(10);
        let mut model = model_for(&run);
        model.errors = serde_json::json!({"unexpected": true});

        let restored = SyncRun::try_from(model).unwrap();
        assert!(restored.errors.is_empty());
    }
}
