//! Daily earnings and the derived cost/profit figures.
//!
//! `consumables_cost_minor` and `net_profit_minor` are owned by the
//! reconciliation step; callers only supply `total_earnings_minor` and `notes`.

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;

use crate::Money;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Earnings {
    pub record_date: NaiveDate,
    pub total_earnings: Money,
    pub consumables_cost: Money,
    pub net_profit: Money,
    pub notes: String,
}

impl Earnings {
    pub fn empty(record_date: NaiveDate) -> Self {
        Self {
            record_date,
            total_earnings: Money::ZERO,
            consumables_cost: Money::ZERO,
            net_profit: Money::ZERO,
            notes: String::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "daily_earnings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub record_date: Date,
    pub total_earnings_minor: i64,
    pub consumables_cost_minor: i64,
    pub net_profit_minor: i64,
    pub notes: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Earnings {
    fn from(value: Model) -> Self {
        Self {
            record_date: value.record_date,
            total_earnings: Money::new(value.total_earnings_minor),
            consumables_cost: Money::new(value.consumables_cost_minor),
            net_profit: Money::new(value.net_profit_minor),
            notes: value.notes,
        }
    }
}
