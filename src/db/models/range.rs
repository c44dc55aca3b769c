use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::TrackerError;

/// Inclusive date filter for trip queries. `All` applies no filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum DateRange {
    All,
    Between { start: NaiveDate, end: NaiveDate },
}

impl DateRange {
    pub fn between(start: NaiveDate, end: NaiveDate) -> Result<Self, TrackerError> {
        if start > end {
            return Err(TrackerError::InvalidRange { start, end });
        }
        Ok(DateRange::Between { start, end })
    }

    pub fn single_day(day: NaiveDate) -> Self {
        DateRange::Between {
            start: day,
            end: day,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match self {
            DateRange::All => true,
            DateRange::Between { start, end } => *start <= date && date <= *end,
        }
    }

    pub fn is_single_day(&self) -> bool {
        matches!(self, DateRange::Between { start, end } if start == end)
    }

    /// Bounds as they are bound into SQL; `None` for an open range.
    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        match self {
            DateRange::All => None,
            DateRange::Between { start, end } => Some((*start, *end)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn between_is_inclusive() {
        let range = DateRange::between(d(2025, 1, 1), d(2025, 1, 31)).unwrap();
        assert!(range.contains(d(2025, 1, 1)));
        assert!(range.contains(d(2025, 1, 31)));
        assert!(!range.contains(d(2025, 2, 1)));
    }

    #[test]
    fn reversed_bounds_are_rejected() {
        let err = DateRange::between(d(2025, 2, 1), d(2025, 1, 1)).unwrap_err();
        assert!(matches!(err, TrackerError::InvalidRange { .. }));
    }

    #[test]
    fn single_day_and_all() {
        assert!(DateRange::single_day(d(2025, 5, 5)).is_single_day());
        assert!(!DateRange::All.is_single_day());
        assert!(DateRange::All.contains(d(1999, 12, 31)));
        assert_eq!(DateRange::All.bounds(), None);
    }
}
