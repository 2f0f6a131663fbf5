use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProductsNew::Table)
                    .if_not_exists()
                    .col(text(ProductsNew::ProductId).primary_key())
                    .col(text(ProductsNew::Name))
                    .col(text(ProductsNew::Category).default(""))
                    .col(text(ProductsNew::Description).default(""))
                    .col(text(ProductsNew::Brand).default(""))
                    .col(text(ProductsNew::Type).default(""))
                    .col(boolean_null(ProductsNew::QdrantIndexed).default(false))
                    .col(timestamp_with_time_zone_null(ProductsNew::QdrantIndexedAt))
                    .col(
                        timestamp_with_time_zone(ProductsNew::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(ProductsNew::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Stale-row discovery scans only unindexed products
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS idx_products_new_unindexed \
                 ON products_new (product_id) \
                 WHERE qdrant_indexed = FALSE OR qdrant_indexed IS NULL",
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_products_new_category_brand")
                    .table(ProductsNew::Table)
                    .col(ProductsNew::Category)
                    .col(ProductsNew::Brand)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProductsNew::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ProductsNew {
    Table,
    ProductId,
    Name,
    Category,
    Description,
    Brand,
    Type,
    QdrantIndexed,
    QdrantIndexedAt,
    CreatedAt,
    UpdatedAt,
}
