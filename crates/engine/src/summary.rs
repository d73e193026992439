//! Read-side views: the daily summary and the weekly report.
//!
//! Both are pure folds over already loaded records, so they can be tested
//! without a store.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::{Baguettes, Earnings, EngineError, Money, ResultEngine, UsageLine};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SummaryTotals {
    pub total_consumables_cost: Money,
    pub total_consumables_used: i64,
    pub total_baguettes_used: i64,
}

/// Everything recorded for one date.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub consumables: Vec<UsageLine>,
    pub baguettes: Baguettes,
    pub earnings: Earnings,
    pub totals: SummaryTotals,
}

impl DailySummary {
    /// Assembles a summary, substituting zero values for missing rows.
    ///
    /// The cost total is recomputed from the lines independently of the
    /// stored `earnings.consumables_cost`.
    pub fn assemble(
        date: NaiveDate,
        consumables: Vec<UsageLine>,
        baguettes: Option<Baguettes>,
        earnings: Option<Earnings>,
    ) -> ResultEngine<Self> {
        let baguettes = baguettes.unwrap_or_else(|| Baguettes::empty(date));
        let earnings = earnings.unwrap_or_else(|| Earnings::empty(date));

        let mut total_cost = Money::ZERO;
        let mut total_used = 0i64;
        for line in &consumables {
            total_cost = total_cost.checked_add(line.cost).ok_or_else(|| {
                EngineError::InvalidAmount("daily cost overflow".to_string())
            })?;
            total_used += i64::from(line.usage.counts.used);
        }

        let totals = SummaryTotals {
            total_consumables_cost: total_cost,
            total_consumables_used: total_used,
            total_baguettes_used: i64::from(baguettes.counts.used),
        };

        Ok(Self {
            date,
            consumables,
            baguettes,
            earnings,
            totals,
        })
    }

    /// An all-zero summary for a date with no records.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            consumables: Vec::new(),
            baguettes: Baguettes::empty(date),
            earnings: Earnings::empty(date),
            totals: SummaryTotals::default(),
        }
    }
}

/// One row of the weekly report. `summary` is `None` when the day could not
/// be loaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DayReport {
    pub date: NaiveDate,
    pub summary: Option<DailySummary>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WeeklyTotals {
    pub total_cost: Money,
    pub total_earnings: Money,
    pub total_net_profit: Money,
    pub total_baguettes_used: i64,
}

/// Used quantity and cost of one consumable over the week.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsumableTotal {
    pub name: String,
    pub used: i64,
    pub cost: Money,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeeklySummary {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub days: Vec<DayReport>,
    pub totals: WeeklyTotals,
    pub consumables: Vec<ConsumableTotal>,
}

/// Folds per-day results into weekly totals.
///
/// Days without a summary contribute zero. Consumables are keyed by name and
/// returned sorted by name.
pub fn fold_week(week_start: NaiveDate, days: Vec<DayReport>) -> ResultEngine<WeeklySummary> {
    let overflow = || EngineError::InvalidAmount("weekly total overflow".to_string());
    let add = |acc: Money, value: Money| acc.checked_add(value).ok_or_else(overflow);

    let mut totals = WeeklyTotals::default();
    let mut per_consumable: BTreeMap<String, (i64, Money)> = BTreeMap::new();

    for summary in days.iter().filter_map(|day| day.summary.as_ref()) {
        totals.total_cost = add(totals.total_cost, summary.totals.total_consumables_cost)?;
        totals.total_earnings = add(totals.total_earnings, summary.earnings.total_earnings)?;
        totals.total_net_profit = add(totals.total_net_profit, summary.earnings.net_profit)?;
        totals.total_baguettes_used = totals
            .total_baguettes_used
            .checked_add(summary.totals.total_baguettes_used)
            .ok_or_else(overflow)?;

        for line in &summary.consumables {
            let entry = per_consumable
                .entry(line.consumable.name.clone())
                .or_insert((0, Money::ZERO));
            entry.0 += i64::from(line.usage.counts.used);
            entry.1 = add(entry.1, line.cost)?;
        }
    }

    let week_end = days.last().map(|day| day.date).unwrap_or(week_start);
    let consumables = per_consumable
        .into_iter()
        .map(|(name, (used, cost))| ConsumableTotal { name, used, cost })
        .collect();

    Ok(WeeklySummary {
        week_start,
        week_end,
        days,
        totals,
        consumables,
    })
}
