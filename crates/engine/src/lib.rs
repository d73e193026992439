//! Daily bookkeeping engine for a single food stall.
//!
//! The engine owns the record store (sea-orm entities), keeps
//! `daily_earnings` consistent with the `consumable_usage` rows of the same
//! date, and builds the daily and weekly read views.

use chrono::NaiveDate;

pub use calendar::{Period, week_dates, week_start};
pub use commands::{
    ConsumableNew, ConsumableUpdate, EarningsSave, ExpenseNew, LeftoversSave, ProductNew,
    ProductUpdate, ProfileUpdate, PurchaseNew, UsageSave, UserNew, UserUpdate,
};
pub use consumable_usage::{Usage, UsageKey, UsageLine, UsageWrite};
pub use consumables::Consumable;
pub use counts::{Counts, CountsPatch, used_count};
pub use daily_baguettes::Baguettes;
pub use daily_earnings::Earnings;
pub use daily_leftovers::Leftovers;
pub use error::EngineError;
pub use expenses::Expense;
pub use money::{MINOR_PER_UNIT, Money};
pub use ops::{Engine, EngineBuilder};
pub use products::Product;
pub use purchases::Purchase;
pub use roles::{Actor, Resource, Role, can_read, can_write};
pub use sales::{Sale, SaleBatch, SaleItem};
pub use summary::{
    ConsumableTotal, DailySummary, DayReport, SummaryTotals, WeeklySummary, WeeklyTotals,
    fold_week,
};
pub use users::User;
pub use util::require_password;

mod calendar;
mod commands;
mod consumable_usage;
mod consumables;
mod counts;
mod daily_baguettes;
mod daily_earnings;
mod daily_leftovers;
mod error;
mod expenses;
mod money;
mod ops;
mod passwords;
mod pending_reconciliations;
mod products;
mod purchases;
mod roles;
mod sales;
mod summary;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;

/// Parse a calendar date in `YYYY-MM-DD` form.
pub fn parse_date(value: &str) -> ResultEngine<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| EngineError::InvalidDate(format!("expected YYYY-MM-DD, got '{value}'")))
}
