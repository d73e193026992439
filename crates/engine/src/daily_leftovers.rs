//! End-of-day leftovers, one row per date.

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Leftovers {
    pub record_date: NaiveDate,
    pub bread_baguettes: i32,
    pub cooked_eggs: i32,
    pub salami_pieces: i32,
    pub notes: String,
}

impl Leftovers {
    pub fn empty(record_date: NaiveDate) -> Self {
        Self {
            record_date,
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "daily_leftovers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub record_date: Date,
    pub bread_baguettes: i32,
    pub cooked_eggs: i32,
    pub salami_pieces: i32,
    pub notes: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Leftovers {
    fn from(value: Model) -> Self {
        Self {
            record_date: value.record_date,
            bread_baguettes: value.bread_baguettes,
            cooked_eggs: value.cooked_eggs,
            salami_pieces: value.salami_pieces,
            notes: value.notes,
        }
    }
}
