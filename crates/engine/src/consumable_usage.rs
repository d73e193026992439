//! Per-date, per-consumable stock usage rows.
//!
//! A row is identified by its [`UsageKey`]; the store holds at most one row per
//! key (unique index on `record_date, consumable_id`).

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;

use crate::{Consumable, Counts, Money, ResultEngine};

/// Composite identity of a usage row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UsageKey {
    pub record_date: NaiveDate,
    pub consumable_id: i32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Usage {
    pub id: i32,
    pub key: UsageKey,
    pub counts: Counts,
}

/// A usage row joined with its catalog entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UsageLine {
    pub usage: Usage,
    pub consumable: Consumable,
    /// `used_count × price`, at the catalog price the line was read with.
    pub cost: Money,
}

impl UsageLine {
    pub fn new(usage: Usage, consumable: Consumable) -> ResultEngine<Self> {
        let cost = consumable.price.times(i64::from(usage.counts.used))?;
        Ok(Self {
            usage,
            consumable,
            cost,
        })
    }
}

/// Result of a usage mutation.
///
/// `reconciled` is `false` when the write committed but the earnings
/// recompute for its date failed and was queued for repair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UsageWrite<T> {
    pub value: T,
    pub reconciled: bool,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "consumable_usage")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub record_date: Date,
    pub consumable_id: i32,
    pub start_count: i32,
    pub end_count: i32,
    pub used_count: i32,
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

impl From<Model> for Usage {
    fn from(value: Model) -> Self {
        Self {
            id: value.id,
            key: UsageKey {
                record_date: value.record_date,
                consumable_id: value.consumable_id,
            },
            counts: Counts {
                start: value.start_count,
                end: value.end_count,
                used: value.used_count,
            },
        }
    }
}
