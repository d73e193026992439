//! Dates whose earnings recompute failed after a usage write.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "pending_reconciliations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub record_date: Date,
    pub failed_at: DateTimeUtc,
    pub last_error: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
