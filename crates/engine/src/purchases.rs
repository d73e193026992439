//! Stock purchases. Append-only; each one raises the consumable stock.

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;

use crate::Money;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Purchase {
    pub id: i32,
    pub consumable_id: i32,
    pub consumable_name: String,
    pub quantity: i32,
    pub cost: Money,
    pub purchase_date: NaiveDate,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "purchases")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub consumable_id: i32,
    pub quantity: i32,
    pub cost_minor: i64,
    pub purchase_date: Date,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::consumables::Entity",
        from = "Column::ConsumableId",
        to = "super::consumables::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Consumable,
}

impl Related<super::consumables::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Consumable.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Purchase {
    pub(crate) fn from_model(model: Model, consumable_name: String) -> Self {
        Self {
            id: model.id,
            consumable_id: model.consumable_id,
            consumable_name,
            quantity: model.quantity,
            cost: Money::new(model.cost_minor),
            purchase_date: model.purchase_date,
        }
    }
}
