//! Sales. One row per sold line item, priced at sale time.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

use crate::Money;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sale {
    pub id: i32,
    pub product_id: i32,
    pub product_name: String,
    pub quantity: i32,
    pub total_price: Money,
    pub sale_timestamp: DateTime<Utc>,
}

/// One line of a sale request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaleItem {
    pub product_id: i32,
    pub quantity: i32,
}

/// A committed multi-line sale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaleBatch {
    pub sales: Vec<Sale>,
    pub total: Money,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "sales")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub total_price_minor: i64,
    pub sale_timestamp: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Product,
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Sale {
    pub(crate) fn from_model(model: Model, product_name: String) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            product_name,
            quantity: model.quantity,
            total_price: Money::new(model.total_price_minor),
            sale_timestamp: model.sale_timestamp,
        }
    }
}
