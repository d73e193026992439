//! Calendar helpers: ISO week windows and listing periods.

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::{EngineError, ResultEngine};

/// Number of days in a report week.
pub const WEEK_LEN: u64 = 7;

fn out_of_range(date: NaiveDate) -> EngineError {
    EngineError::InvalidDate(format!("{date} is outside the supported calendar"))
}

/// Returns the Monday of the week containing `anchor`.
///
/// Sunday belongs to the week that started six days earlier.
pub fn week_start(anchor: NaiveDate) -> ResultEngine<NaiveDate> {
    let offset = anchor.weekday().num_days_from_monday();
    anchor
        .checked_sub_days(Days::new(u64::from(offset)))
        .ok_or_else(|| out_of_range(anchor))
}

/// The seven consecutive dates of the week containing `anchor`.
pub fn week_dates(anchor: NaiveDate) -> ResultEngine<Vec<NaiveDate>> {
    let start = week_start(anchor)?;
    (0..WEEK_LEN)
        .map(|i| {
            start
                .checked_add_days(Days::new(i))
                .ok_or_else(|| out_of_range(anchor))
        })
        .collect()
}

/// Half-open calendar range `[start, end)` used to filter listings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    pub fn day(date: NaiveDate) -> ResultEngine<Self> {
        let end = date
            .checked_add_days(Days::new(1))
            .ok_or_else(|| out_of_range(date))?;
        Ok(Self { start: date, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    /// Parses `today`, `YYYY-MM-DD`, `YYYY-MM` or `YYYY`.
    ///
    /// `today` resolves against the supplied date so callers control the clock.
    pub fn parse(input: &str, today: NaiveDate) -> ResultEngine<Self> {
        let input = input.trim();
        let invalid = || EngineError::InvalidDate(format!("unsupported period '{input}'"));

        if input.eq_ignore_ascii_case("today") {
            return Self::day(today);
        }

        let parts: Vec<&str> = input.split('-').collect();
        let number = |part: &str| -> ResultEngine<u32> {
            if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse().map_err(|_| invalid())
        };
        let year = |part: &str| -> ResultEngine<i32> {
            i32::try_from(number(part)?).map_err(|_| invalid())
        };

        match parts.as_slice() {
            [y, month, day] => {
                let date = NaiveDate::from_ymd_opt(year(y)?, number(month)?, number(day)?)
                    .ok_or_else(invalid)?;
                Self::day(date).map_err(|_| invalid())
            }
            [y, month] => {
                let start = NaiveDate::from_ymd_opt(year(y)?, number(month)?, 1)
                    .ok_or_else(invalid)?;
                let end = start.checked_add_months(Months::new(1)).ok_or_else(invalid)?;
                Ok(Self { start, end })
            }
            [y] if y.len() == 4 => {
                let start = NaiveDate::from_ymd_opt(year(y)?, 1, 1).ok_or_else(invalid)?;
                let end = start
                    .checked_add_months(Months::new(12))
                    .ok_or_else(invalid)?;
                Ok(Self { start, end })
            }
            _ => Err(invalid()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_starts_on_monday() {
        // 2024-01-08 is a Monday.
        assert_eq!(week_start(date(2024, 1, 8)).unwrap(), date(2024, 1, 8));
        assert_eq!(week_start(date(2024, 1, 10)).unwrap(), date(2024, 1, 8));
        assert_eq!(week_start(date(2024, 1, 13)).unwrap(), date(2024, 1, 8));
    }

    #[test]
    fn sunday_belongs_to_previous_monday() {
        assert_eq!(week_start(date(2024, 1, 14)).unwrap(), date(2024, 1, 8));
        assert_eq!(week_start(date(2024, 1, 7)).unwrap(), date(2024, 1, 1));
    }

    #[test]
    fn week_dates_cross_month_boundary() {
        let dates = week_dates(date(2024, 2, 1)).unwrap();
        assert_eq!(dates.len(), 7);
        assert_eq!(dates[0], date(2024, 1, 29));
        assert_eq!(dates[6], date(2024, 2, 4));
    }

    #[test]
    fn period_parses_every_granularity() {
        let today = date(2024, 3, 15);
        assert_eq!(
            Period::parse("today", today).unwrap(),
            Period::day(today).unwrap()
        );
        assert_eq!(
            Period::parse("2024-01-10", today).unwrap(),
            Period {
                start: date(2024, 1, 10),
                end: date(2024, 1, 11)
            }
        );
        assert_eq!(
            Period::parse("2024-12", today).unwrap(),
            Period {
                start: date(2024, 12, 1),
                end: date(2025, 1, 1)
            }
        );
        assert_eq!(
            Period::parse("2023", today).unwrap(),
            Period {
                start: date(2023, 1, 1),
                end: date(2024, 1, 1)
            }
        );
    }

    #[test]
    fn period_rejects_malformed_input() {
        let today = date(2024, 3, 15);
        assert!(Period::parse("", today).is_err());
        assert!(Period::parse("24", today).is_err());
        assert!(Period::parse("2024-13", today).is_err());
        assert!(Period::parse("2024-02-30", today).is_err());
        assert!(Period::parse("yesterday", today).is_err());
    }

    #[test]
    fn period_is_half_open() {
        let period = Period::parse("2024-02", date(2024, 1, 1)).unwrap();
        assert!(period.contains(date(2024, 2, 29)));
        assert!(!period.contains(date(2024, 3, 1)));
    }

    #[test]
    fn week_at_calendar_edges_is_an_error() {
        assert!(matches!(
            week_dates(NaiveDate::MAX),
            Err(EngineError::InvalidDate(_))
        ));
    }

    #[test]
    fn last_representable_day_has_no_period() {
        assert!(Period::day(NaiveDate::MAX).is_err());
        assert!(matches!(
            Period::parse("262142-12-31", date(2024, 1, 1)),
            Err(EngineError::InvalidDate(_))
        ));
    }

    #[test]
    fn oversized_year_does_not_wrap() {
        let today = date(2024, 1, 1);
        assert!(Period::parse("4294967295-01-01", today).is_err());
        assert!(Period::parse("4294967295-01", today).is_err());
        assert!(Period::parse("2147483648-01-01", today).is_err());
    }
}
