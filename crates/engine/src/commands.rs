//! Command structs for engine write operations.
//!
//! Each patch type lists exactly the fields a caller may change; `None` means
//! "keep the stored value".

use chrono::NaiveDate;

use crate::{Money, Role};

#[derive(Clone, Debug)]
pub struct ConsumableNew {
    pub name: String,
    pub price: Money,
}

#[derive(Clone, Debug, Default)]
pub struct ConsumableUpdate {
    pub name: Option<String>,
    pub price: Option<Money>,
}

impl ConsumableUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none()
    }
}

#[derive(Clone, Debug)]
pub struct ProductNew {
    pub name: String,
    pub category: Option<String>,
    pub price: Money,
}

#[derive(Clone, Debug, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<Money>,
}

impl ProductUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.category.is_none() && self.price.is_none()
    }
}

/// Upsert of one usage row, keyed by `(record_date, consumable_id)`.
#[derive(Clone, Copy, Debug)]
pub struct UsageSave {
    pub record_date: NaiveDate,
    pub consumable_id: i32,
    pub start_count: i32,
    pub end_count: i32,
}

#[derive(Clone, Debug)]
pub struct EarningsSave {
    pub record_date: NaiveDate,
    pub total_earnings: Money,
    pub notes: Option<String>,
}

#[derive(Clone, Debug)]
pub struct PurchaseNew {
    pub consumable_id: i32,
    pub quantity: i32,
    pub cost: Money,
    /// Defaults to the current date.
    pub purchase_date: Option<NaiveDate>,
}

#[derive(Clone, Debug)]
pub struct ExpenseNew {
    pub kind: String,
    pub amount: Money,
    pub description: Option<String>,
    /// Defaults to the current date.
    pub expense_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, Default)]
pub struct LeftoversSave {
    pub record_date: NaiveDate,
    pub bread_baguettes: Option<i32>,
    pub cooked_eggs: Option<i32>,
    pub salami_pieces: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Clone, Debug)]
pub struct UserNew {
    pub name: String,
    pub password: String,
    pub role: Role,
}

/// Privileged edit of another account.
#[derive(Clone, Debug, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub role: Option<Role>,
    pub new_password: Option<String>,
}

/// Self-service edit of the caller's own account.
#[derive(Clone, Debug, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}
