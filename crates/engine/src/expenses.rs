//! Miscellaneous expenses (rent, gas, ...).

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;

use crate::Money;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expense {
    pub id: i32,
    pub kind: String,
    pub amount: Money,
    pub description: Option<String>,
    pub expense_date: NaiveDate,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub kind: String,
    pub amount_minor: i64,
    pub description: Option<String>,
    pub expense_date: Date,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Expense {
    fn from(value: Model) -> Self {
        Self {
            id: value.id,
            kind: value.kind,
            amount: Money::new(value.amount_minor),
            description: value.description,
            expense_date: value.expense_date,
        }
    }
}
