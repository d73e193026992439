use chrono::{Local, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use sea_orm::{DatabaseConnection, prelude::DateTimeUtc};

use crate::{EngineError, Period, ResultEngine};

mod aggregate;
mod catalog;
mod earnings;
mod expenses;
mod leftovers;
mod purchases;
mod reconcile;
mod reports;
mod sales;
mod usage;
mod users;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// Local calendar date used when a caller omits one.
fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn now() -> DateTimeUtc {
    Utc::now()
}

/// Bounds of a period in UTC, with days starting at local midnight.
fn period_bounds(period: Period) -> ResultEngine<(DateTimeUtc, DateTimeUtc)> {
    period_bounds_in(period, &Local)
}

fn period_bounds_in<Tz: TimeZone>(
    period: Period,
    tz: &Tz,
) -> ResultEngine<(DateTimeUtc, DateTimeUtc)> {
    Ok((start_of_day(period.start, tz)?, start_of_day(period.end, tz)?))
}

/// First instant of `date` in `tz`. A midnight skipped by a DST jump falls
/// back to the first valid time of the day.
fn start_of_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> ResultEngine<DateTimeUtc> {
    let midnight = date.and_time(NaiveTime::MIN);
    (0..=2)
        .find_map(|hours| {
            let local = midnight.checked_add_signed(TimeDelta::hours(hours))?;
            tz.from_local_datetime(&local).earliest()
        })
        .map(|instant| instant.with_timezone(&Utc))
        .ok_or_else(|| EngineError::InvalidDate(format!("no local midnight for {date}")))
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::FixedOffset;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn period_bounds_follow_the_local_day() {
        let est = FixedOffset::west_opt(5 * 3600).unwrap();
        let (from, to) = period_bounds_in(Period::day(date(2026, 10, 18)).unwrap(), &est).unwrap();
        assert_eq!(from.to_rfc3339(), "2026-10-18T05:00:00+00:00");
        assert_eq!(to.to_rfc3339(), "2026-10-19T05:00:00+00:00");

        // 01:04Z on the 19th is still the 18th in EST.
        let late_sale = Utc.with_ymd_and_hms(2026, 10, 19, 1, 4, 0).unwrap();
        assert!(from <= late_sale && late_sale < to);
    }

    #[test]
    fn period_bounds_in_utc_are_midnight() {
        let (from, _) = period_bounds_in(Period::day(date(2024, 1, 10)).unwrap(), &Utc).unwrap();
        assert_eq!(from.to_rfc3339(), "2024-01-10T00:00:00+00:00");
    }
}
