use chrono::NaiveDate;

use crate::{DailySummary, ResultEngine};

use super::{Engine, earnings::earnings_on, usage::baguettes_on, usage::usage_lines};

impl Engine {
    /// Everything recorded for `date`, with zero defaults for missing rows.
    ///
    /// The three reads run concurrently. The cost total is folded from the
    /// usage lines, independently of the stored earnings row.
    pub async fn summarize(&self, date: NaiveDate) -> ResultEngine<DailySummary> {
        let (lines, baguettes, earnings) = futures::try_join!(
            usage_lines(&self.database, date),
            baguettes_on(&self.database, date),
            earnings_on(&self.database, date),
        )?;

        DailySummary::assemble(date, lines, Some(baguettes), Some(earnings))
    }
}
