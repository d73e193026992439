use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Error payload returned with every non-2xx response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
}

pub mod user {
    use super::*;

    /// Account role. `vip` and `admin` manage the catalog and the users.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Role {
        User,
        Vip,
        Admin,
    }

    impl Role {
        /// Returns the canonical role string used by the engine/database.
        pub fn as_str(self) -> &'static str {
            match self {
                Self::User => "user",
                Self::Vip => "vip",
                Self::Admin => "admin",
            }
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: i32,
        pub name: String,
        pub role: Role,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserNew {
        pub name: String,
        pub password: String,
        pub role: Role,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct UserUpdate {
        pub name: Option<String>,
        pub role: Option<Role>,
        pub new_password: Option<String>,
    }
}

pub mod auth {
    use super::*;
    use crate::user::UserView;

    /// Body of both `register` and `login`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Credentials {
        pub name: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TokenResponse {
        pub token: String,
        pub user: UserView,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ProfileUpdate {
        pub name: Option<String>,
        pub current_password: Option<String>,
        pub new_password: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProfileResponse {
        pub user: UserView,
        /// A fresh token when the name changed, since tokens carry the name.
        pub token: Option<String>,
    }
}

pub mod catalog {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ConsumableView {
        pub id: i32,
        pub name: String,
        pub price_minor: i64,
        pub current_stock: i32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ConsumableNew {
        pub name: String,
        pub price_minor: i64,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ConsumableUpdate {
        pub name: Option<String>,
        pub price_minor: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProductView {
        pub id: i32,
        pub name: String,
        pub category: Option<String>,
        pub price_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProductNew {
        pub name: String,
        pub category: Option<String>,
        pub price_minor: i64,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ProductUpdate {
        pub name: Option<String>,
        /// An empty string clears the category.
        pub category: Option<String>,
        pub price_minor: Option<i64>,
    }
}

pub mod daily {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UsageSave {
        pub record_date: NaiveDate,
        pub consumable_id: i32,
        pub start_count: i32,
        pub end_count: i32,
    }

    /// Partial count update. `used_count` is always derived server-side.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct UsagePatch {
        pub start_count: Option<i32>,
        pub end_count: Option<i32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UsageView {
        pub id: i32,
        pub record_date: NaiveDate,
        pub consumable_id: i32,
        pub start_count: i32,
        pub end_count: i32,
        pub used_count: i32,
    }

    /// A usage row joined with its catalog entry.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UsageLineView {
        pub id: i32,
        pub record_date: NaiveDate,
        pub consumable_id: i32,
        pub consumable_name: String,
        pub price_minor: i64,
        pub start_count: i32,
        pub end_count: i32,
        pub used_count: i32,
        pub cost_minor: i64,
    }

    /// Result of a usage mutation.
    ///
    /// `reconciled` is `false` when the earnings of the date could not be
    /// recomputed; the date is then queued for repair.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UsageWriteResponse {
        pub usage: UsageView,
        pub reconciled: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BaguettesSave {
        pub record_date: NaiveDate,
        pub start_count: i32,
        pub end_count: i32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BaguettesView {
        pub record_date: NaiveDate,
        pub start_count: i32,
        pub end_count: i32,
        pub used_count: i32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EarningsSave {
        pub record_date: NaiveDate,
        pub total_earnings_minor: i64,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EarningsView {
        pub record_date: NaiveDate,
        pub total_earnings_minor: i64,
        pub consumables_cost_minor: i64,
        pub net_profit_minor: i64,
        pub notes: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SummaryTotalsView {
        pub total_consumables_cost_minor: i64,
        pub total_consumables_used: i64,
        pub total_baguettes_used: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DailySummaryView {
        pub date: NaiveDate,
        pub consumables: Vec<UsageLineView>,
        pub baguettes: BaguettesView,
        pub earnings: EarningsView,
        pub totals: SummaryTotalsView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RepairResponse {
        pub repaired: usize,
        /// Dates still waiting for a successful reconciliation.
        pub pending: Vec<NaiveDate>,
    }
}

pub mod reports {
    use super::*;
    use crate::daily::DailySummaryView;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DayView {
        pub date: NaiveDate,
        /// Absent when the day failed to load; it counts as zero.
        pub summary: Option<DailySummaryView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WeeklyTotalsView {
        pub total_cost_minor: i64,
        pub total_earnings_minor: i64,
        pub total_net_profit_minor: i64,
        pub total_baguettes_used: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ConsumableTotalView {
        pub name: String,
        pub used: i64,
        pub cost_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WeeklySummaryView {
        pub week_start: NaiveDate,
        pub week_end: NaiveDate,
        pub days: Vec<DayView>,
        pub totals: WeeklyTotalsView,
        pub consumables: Vec<ConsumableTotalView>,
    }
}

pub mod ledger {
    use super::*;

    /// `?date=` filter: `today`, `YYYY-MM-DD`, `YYYY-MM` or `YYYY`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct PeriodQuery {
        pub date: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PurchaseNew {
        pub consumable_id: i32,
        pub quantity: i32,
        pub cost_minor: i64,
        /// Defaults to today.
        pub purchase_date: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PurchaseView {
        pub id: i32,
        pub consumable_id: i32,
        pub consumable_name: String,
        pub quantity: i32,
        pub cost_minor: i64,
        pub purchase_date: NaiveDate,
    }

    #[derive(Clone, Copy, Debug, Serialize, Deserialize)]
    pub struct SaleItem {
        pub product_id: i32,
        pub quantity: i32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SaleNew {
        pub items: Vec<SaleItem>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SaleView {
        pub id: i32,
        pub product_id: i32,
        pub product_name: String,
        pub quantity: i32,
        pub total_price_minor: i64,
        pub sale_timestamp: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SaleBatchView {
        pub sales: Vec<SaleView>,
        pub total_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub kind: String,
        pub amount_minor: i64,
        pub description: Option<String>,
        /// Defaults to today.
        pub expense_date: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: i32,
        pub kind: String,
        pub amount_minor: i64,
        pub description: Option<String>,
        pub expense_date: NaiveDate,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LeftoversQuery {
        pub date: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LeftoversSave {
        pub record_date: NaiveDate,
        pub bread_baguettes: Option<i32>,
        pub cooked_eggs: Option<i32>,
        pub salami_pieces: Option<i32>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LeftoversView {
        pub record_date: NaiveDate,
        pub bread_baguettes: i32,
        pub cooked_eggs: i32,
        pub salami_pieces: i32,
        pub notes: String,
    }
}
