use crate::models::ProductRecord;
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};

/// Sea-ORM Entity for the products_new table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products_new")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub product_id: String,
    #[sea_orm(column_type = "Text")]
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub category: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Text")]
    pub brand: String,
    #[sea_orm(column_name = "type", column_type = "Text")]
    pub product_type: String,
    pub qdrant_indexed: Option<bool>,
    pub qdrant_indexed_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ProductRecord {
    fn from(model: Model) -> Self {
        // A NULL flag reads as "not indexed"; the timestamp only counts alongside it.
        let qdrant_indexed = model.qdrant_indexed.unwrap_or(false);
        let qdrant_indexed_at = model
            .qdrant_indexed_at
            .filter(|_| qdrant_indexed)
            .map(Into::into);

        Self {
            product_id: model.product_id,
            name: model.name,
            category: model.category,
            description: model.description,
            brand: model.brand,
            product_type: model.product_type,
            qdrant_indexed,
            qdrant_indexed_at,
        }
    }
}

impl From<&ProductRecord> for ActiveModel {
    fn from(product: &ProductRecord) -> Self {
        let now = chrono::Utc::now();

        ActiveModel {
            product_id: Set(product.product_id.clone()),
            name: Set(product.name.clone()),
            category: Set(product.category.clone()),
            description: Set(product.description.clone()),
            brand: Set(product.brand.clone()),
            product_type: Set(product.product_type.clone()),
            qdrant_indexed: Set(Some(product.qdrant_indexed)),
            qdrant_indexed_at: Set(product.qdrant_indexed_at.map(Into::into)),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
    }
}
