use chrono::NaiveDate;
use futures::future::join_all;

use crate::{DayReport, ResultEngine, WeeklySummary, fold_week, week_dates, week_start};

use super::Engine;

impl Engine {
    /// Weekly report for the Monday-to-Sunday week containing `anchor`.
    ///
    /// A day that fails to load is logged and reported without a summary; it
    /// never fails the whole week. Anchors at the edge of the calendar are
    /// rejected as invalid dates.
    pub async fn weekly_report(&self, anchor: NaiveDate) -> ResultEngine<WeeklySummary> {
        let start = week_start(anchor)?;
        let dates = week_dates(anchor)?;
        let results = join_all(dates.iter().map(|&date| self.summarize(date))).await;

        let days = dates
            .into_iter()
            .zip(results)
            .map(|(date, result)| {
                let summary = result
                    .inspect_err(|err| tracing::warn!(%date, error = %err, "daily summary failed"))
                    .ok();
                DayReport { date, summary }
            })
            .collect();

        fold_week(start, days)
    }
}
