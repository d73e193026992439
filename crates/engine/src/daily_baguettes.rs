//! Daily bread (baguette) counts, one row per date.

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;

use crate::Counts;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Baguettes {
    pub record_date: NaiveDate,
    pub counts: Counts,
}

impl Baguettes {
    /// The "no activity yet" value for a date without a row.
    pub fn empty(record_date: NaiveDate) -> Self {
        Self {
            record_date,
            counts: Counts::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "daily_baguettes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub record_date: Date,
    pub start_count: i32,
    pub end_count: i32,
    pub used_count: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Baguettes {
    fn from(value: Model) -> Self {
        Self {
            record_date: value.record_date,
            counts: Counts {
                start: value.start_count,
                end: value.end_count,
                used: value.used_count,
            },
        }
    }
}
