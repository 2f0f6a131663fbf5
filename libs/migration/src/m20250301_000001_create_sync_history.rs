use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SyncHistory::Table)
                    .if_not_exists()
                    .col(pk_auto(SyncHistory::Id))
                    .col(uuid_uniq(SyncHistory::SyncId))
                    .col(timestamp_with_time_zone(SyncHistory::StartedAt))
                    .col(timestamp_with_time_zone_null(SyncHistory::CompletedAt))
                    .col(double_null(SyncHistory::DurationSeconds))
                    .col(integer(SyncHistory::TotalProducts))
                    .col(integer(SyncHistory::ProcessedProducts))
                    .col(integer(SyncHistory::FailedProducts))
                    .col(string_len(SyncHistory::Status, 20))
                    .col(integer(SyncHistory::BatchSize))
                    .col(json_binary(SyncHistory::Errors).default(Expr::cust("'[]'::jsonb")))
                    .col(
                        timestamp_with_time_zone(SyncHistory::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_sync_history_started_at")
                    .table(SyncHistory::Table)
                    .col(SyncHistory::StartedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SyncHistory::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum SyncHistory {
    Table,
    Id,
    SyncId,
    StartedAt,
    CompletedAt,
    DurationSeconds,
    TotalProducts,
    ProcessedProducts,
    FailedProducts,
    Status,
    BatchSize,
    Errors,
    CreatedAt,
}
