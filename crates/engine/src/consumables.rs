//! Consumables: stock items with a unit price, counted every day.

use sea_orm::entity::prelude::*;

use crate::Money;

/// A consumable catalog item (bread, eggs, ...).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Consumable {
    pub id: i32,
    pub name: String,
    pub price: Money,
    pub current_stock: i32,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "consumables")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// Case-folded name used for uniqueness checks.
    #[sea_orm(unique)]
    pub name_key: String,
    pub price_minor: i64,
    pub current_stock: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::consumable_usage::Entity")]
    Usage,
    #[sea_orm(has_many = "super::purchases::Entity")]
    Purchases,
}

impl Related<super::consumable_usage::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Usage.def()
    }
}

impl Related<super::purchases::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Purchases.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Consumable {
    fn from(value: Model) -> Self {
        Self {
            id: value.id,
            name: value.name,
            price: Money::new(value.price_minor),
            current_stock: value.current_stock,
        }
    }
}
