//! Start/end stock counts and the derived used count.

use crate::{EngineError, ResultEngine};

/// Returns the consumed quantity for a day: `max(0, start - end)`.
pub fn used_count(start: i32, end: i32) -> i32 {
    (start - end).max(0)
}

/// A validated pair of start/end counts with its derived used count.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counts {
    pub start: i32,
    pub end: i32,
    pub used: i32,
}

impl Counts {
    pub fn new(start: i32, end: i32) -> ResultEngine<Self> {
        check_count("start_count", start)?;
        check_count("end_count", end)?;
        Ok(Self {
            start,
            end,
            used: used_count(start, end),
        })
    }
}

/// Partial update of a start/end pair. Absent fields keep their stored value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CountsPatch {
    pub start: Option<i32>,
    pub end: Option<i32>,
}

impl CountsPatch {
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Merges the patch over the stored pair and recomputes the used count.
    ///
    /// The used count is never taken from the caller: when only one side of
    /// the pair changes, the sibling comes from `current`.
    pub fn resolve(&self, current: Counts) -> ResultEngine<Counts> {
        Counts::new(
            self.start.unwrap_or(current.start),
            self.end.unwrap_or(current.end),
        )
    }
}

pub(crate) fn check_count(field: &str, value: i32) -> ResultEngine<()> {
    if value < 0 {
        return Err(EngineError::InvalidCount(format!("{field} must be >= 0")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn used_count_clamps_at_zero() {
        assert_eq!(used_count(10, 3), 7);
        assert_eq!(used_count(3, 10), 0);
        assert_eq!(used_count(5, 5), 0);
        assert_eq!(used_count(0, 0), 0);
    }

    #[test]
    fn counts_reject_negative_values() {
        assert!(Counts::new(-1, 0).is_err());
        assert!(Counts::new(0, -1).is_err());
        assert_eq!(Counts::new(50, 12).unwrap().used, 38);
    }

    #[test]
    fn patch_fetches_sibling_from_current() {
        let current = Counts::new(10, 4).unwrap();

        let only_end = CountsPatch {
            start: None,
            end: Some(1),
        };
        assert_eq!(
            only_end.resolve(current).unwrap(),
            Counts {
                start: 10,
                end: 1,
                used: 9
            }
        );

        let only_start = CountsPatch {
            start: Some(3),
            end: None,
        };
        assert_eq!(only_start.resolve(current).unwrap().used, 0);

        let both = CountsPatch {
            start: Some(20),
            end: Some(5),
        };
        assert_eq!(both.resolve(current).unwrap().used, 15);
    }

    #[test]
    fn empty_patch_keeps_current() {
        let current = Counts::new(7, 2).unwrap();
        let patch = CountsPatch::default();
        assert!(patch.is_empty());
        assert_eq!(patch.resolve(current).unwrap(), current);
    }
}
