use chrono::{DateTime, Utc};
use sea_orm::{sea_query::StringLen, DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;

/// Upper bound on error strings kept per sync run
pub const MAX_RECORDED_ERRORS: usize = 10;

/// A catalog row as seen by the sync engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductRecord {
    pub product_id: String,
    pub name: String,
    pub category: String,
    pub description: String,
    pub brand: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub qdrant_indexed: bool,
    pub qdrant_indexed_at: Option<DateTime<Utc>>,
}

impl ProductRecord {
    /// A not-yet-indexed product
    pub fn new(
        product_id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        brand: impl Into<String>,
        product_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            category: category.into(),
            description: description.into(),
            brand: brand.into(),
            product_type: product_type.into(),
            qdrant_indexed: false,
            qdrant_indexed_at: None,
        }
    }

    pub fn is_stale(&self) -> bool {
        !self.qdrant_indexed
    }

    /// Flag and timestamp always move together
    pub fn mark_indexed(&mut self, at: DateTime<Utc>) {
        self.qdrant_indexed = true;
        self.qdrant_indexed_at = Some(at);
    }
}

/// Lifecycle status of a sync run
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SyncStatus {
    #[default]
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "running")]
    Running,
    /// Every candidate was indexed and written back
    #[sea_orm(string_value = "success")]
    Success,
    #[sea_orm(string_value = "failed")]
    Failed,
    /// Some batches succeeded, some failed
    #[sea_orm(string_value = "partial")]
    Partial,
}

impl SyncStatus {
    pub fn from_counts(processed: u32, failed: u32) -> Self {
        if failed == 0 {
            SyncStatus::Success
        } else if processed > 0 {
            SyncStatus::Partial
        } else {
            SyncStatus::Failed
        }
    }
}

/// One reconciliation run, appended once to the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SyncRun {
    pub sync_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub duration_seconds: Option<f64>,
    pub total_products: u32,
    pub processed_products: u32,
    pub failed_products: u32,
    pub status: SyncStatus,
    pub batch_size: u32,
    pub errors: Vec<String>,
}

impl SyncRun {
    /// A fresh run in `running` state
    pub fn start(batch_size: u32) -> Self {
        Self {
            sync_id: Uuid::new_v4(),
            started_at: Utc::now(),
            completed_at: None,
            duration_seconds: None,
            total_products: 0,
            processed_products: 0,
            failed_products: 0,
            status: SyncStatus::Running,
            batch_size,
            errors: Vec::new(),
        }
    }

    /// Keep at most [`MAX_RECORDED_ERRORS`] messages; later ones are dropped.
    pub fn record_error(&mut self, message: impl Into<String>) {
        if self.errors.len() < MAX_RECORDED_ERRORS {
            self.errors.push(message.into());
        }
    }

    /// Stamp completion and derive status from the counters
    pub fn complete(&mut self) {
        self.status = SyncStatus::from_counts(self.processed_products, self.failed_products);
        self.stamp_completion();
    }

    /// Abort before any batch ran
    pub fn abort(&mut self, message: impl Into<String>) {
        self.record_error(message);
        self.status = SyncStatus::Failed;
        self.stamp_completion();
    }

    fn stamp_completion(&mut self) {
        let completed_at = Utc::now();
        let elapsed = completed_at - self.started_at;
        self.duration_seconds = Some(elapsed.num_microseconds().unwrap_or(0) as f64 / 1_000_000.0);
        self.completed_at = Some(completed_at);
    }

    pub fn is_success(&self) -> bool {
        self.status == SyncStatus::Success
    }

    /// True when at least part of the catalog made it into the index
    pub fn succeeded(&self) -> bool {
        matches!(self.status, SyncStatus::Success | SyncStatus::Partial)
    }

    /// Operator-facing one-liner for the run
    pub fn summary(&self) -> String {
        match self.status {
            SyncStatus::Success if self.total_products == 0 => "No products to sync".to_string(),
            SyncStatus::Success => {
                format!("Successfully synced {} products", self.processed_products)
            }
            SyncStatus::Partial => format!(
                "Partially synced: {} success, {} failed",
                self.processed_products, self.failed_products
            ),
            SyncStatus::Failed if self.failed_products == 0 => match self.errors.first() {
                Some(error) => format!("Sync failed: {error}"),
                None => "Sync failed".to_string(),
            },
            SyncStatus::Failed => {
                format!("Sync failed: {} products failed", self.failed_products)
            }
            SyncStatus::Pending | SyncStatus::Running => "Sync in progress".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_counts() {
        assert_eq!(SyncStatus::from_counts(10, 0), SyncStatus::Success);
        assert_eq!(SyncStatus::from_counts(0, 0), SyncStatus::Success);
        assert_eq!(SyncStatus::from_counts(8, 2), SyncStatus::Partial);
        assert_eq!(SyncStatus::from_counts(0, 5), SyncStatus::Failed);
    }

    #[test]
    fn test_status_string_round_trip() {
        assert_eq!(SyncStatus::Partial.to_string(), "partial");
        assert_eq!("failed".parse::<SyncStatus>().unwrap(), SyncStatus::Failed);
        assert_eq!(
            serde_json::to_value(SyncStatus::Success).unwrap(),
            serde_json::json!("success")
        );
    }

    #[test]
    fn test_errors_are_capped() {
        let mut run = SyncRun::start(10);
        for i in 0..25 {
            run.record_error(format!("batch {i} failed"));
        }
        assert_eq!(run.errors.len(), MAX_RECORDED_ERRORS);
        assert_eq!(run.errors[0], "batch 0 failed");
    }

    #[test]
    fn test_complete_sets_timestamps_and_status() {
        let mut run = SyncRun::start(2);
        run.total_products = 3;
        run.processed_products = 2;
        run.failed_products = 1;
        run.complete();

        assert_eq!(run.status, SyncStatus::Partial);
        assert!(run.succeeded());
        assert!(!run.is_success());
        assert!(run.completed_at.unwrap() >= run.started_at);
        assert!(run.duration_seconds.unwrap() >= 0.0);
    }

    #[test]
    fn test_abort_marks_failed_with_error() {
        let mut run = SyncRun::start(100);
        run.abort("collection unavailable");

        assert_eq!(run.status, SyncStatus::Failed);
        assert!(!run.succeeded());
        assert_eq!(run.errors, vec!["collection unavailable".to_string()]);
        assert_eq!(run.total_products, 0);
        assert_eq!(run.summary(), "Sync failed: collection unavailable");
    }

    #[test]
    fn test_summaries() {
        let mut run = SyncRun::start(100);
        run.complete();
        assert_eq!(run.summary(), "No products to sync");

        run.total_products = 5;
        run.processed_products = 5;
        run.complete();
        assert_eq!(run.summary(), "Successfully synced 5 products");

        run.processed_products = 3;
        run.failed_products = 2;
        run.complete();
        assert_eq!(run.summary(), "Partially synced: 3 success, 2 failed");

        run.processed_products = 0;
        run.failed_products = 5;
        run.complete();
        assert_eq!(run.summary(), "Sync failed: 5 products failed");
    }

    #[test]
    fn test_product_serializes_type_field() {
        let product = ProductRecord::new("p1", "Trail Shoe", "Footwear", "Acme", "Running", "Light");
        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["type"], "Running");
        assert!(product.is_stale());
    }
}
