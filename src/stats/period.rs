use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{db::DateRange, error::TrackerError};

/// Named reporting window, resolved against a reference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum Period {
    Today,
    /// Monday through Sunday around the reference day.
    ThisWeek,
    ThisMonth,
    LastSixMonths,
    ThisYear,
    AllTime,
    Custom { start: NaiveDate, end: NaiveDate },
}

impl Period {
    pub fn label(&self) -> String {
        match self {
            Period::Today => "Today".into(),
            Period::ThisWeek => "This week".into(),
            Period::ThisMonth => "This month".into(),
            Period::LastSixMonths => "Last 6 months".into(),
            Period::ThisYear => "This year".into(),
            Period::AllTime => "All time".into(),
            Period::Custom { start, end } => format!("{start} to {end}"),
        }
    }

    pub fn resolve(&self, today: NaiveDate) -> Result<DateRange, TrackerError> {
        let range = match *self {
            Period::Today => DateRange::single_day(today),
            Period::ThisWeek => {
                let monday = today - Days::new(u64::from(today.weekday().num_days_from_monday()));
                DateRange::between(monday, monday + Days::new(6))?
            }
            Period::ThisMonth => {
                let first = first_of_month(today);
                let last = first
                    .checked_add_months(Months::new(1))
                    .and_then(|next| next.pred_opt())
                    .unwrap_or(NaiveDate::MAX);
                DateRange::between(first, last)?
            }
            Period::LastSixMonths => {
                let start = today
                    .checked_sub_months(Months::new(6))
                    .unwrap_or(NaiveDate::MIN);
                DateRange::between(start, today)?
            }
            Period::ThisYear => {
                let start = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
                DateRange::between(start, today)?
            }
            Period::AllTime => DateRange::All,
            Period::Custom { start, end } => DateRange::between(start, end)?,
        };
        Ok(range)
    }
}

fn first_of_month(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use proptest::prelude::*;
    use rstest::rstest;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[rstest]
    #[case::today(Period::Today, d(2025, 3, 12), d(2025, 3, 12))]
    #[case::week_midweek(Period::ThisWeek, d(2025, 3, 10), d(2025, 3, 16))]
    #[case::month(Period::ThisMonth, d(2025, 3, 1), d(2025, 3, 31))]
    #[case::six_months(Period::LastSixMonths, d(2024, 9, 12), d(2025, 3, 12))]
    #[case::year(Period::ThisYear, d(2025, 1, 1), d(2025, 3, 12))]
    fn resolves_relative_to_today(
        #[case] period: Period,
        #[case] start: NaiveDate,
        #[case] end: NaiveDate,
    ) {
        let today = d(2025, 3, 12);
        assert_eq!(
            period.resolve(today).unwrap(),
            DateRange::Between { start, end }
        );
    }

    #[test]
    fn february_month_ends_on_leap_day() {
        let range = Period::ThisMonth.resolve(d(2024, 2, 10)).unwrap();
        assert_eq!(range.bounds(), Some((d(2024, 2, 1), d(2024, 2, 29))));
    }

    #[test]
    fn six_months_back_clamps_the_day() {
        let range = Period::LastSixMonths.resolve(d(2025, 8, 31)).unwrap();
        assert_eq!(range.bounds(), Some((d(2025, 2, 28), d(2025, 8, 31))));
    }

    #[test]
    fn all_time_is_open_and_custom_is_validated() {
        assert_eq!(Period::AllTime.resolve(d(2025, 1, 1)).unwrap(), DateRange::All);

        let reversed = Period::Custom {
            start: d(2025, 2, 1),
            end: d(2025, 1, 1),
        };
        assert!(matches!(
            reversed.resolve(d(2025, 3, 1)),
            Err(TrackerError::InvalidRange { .. })
        ));
    }

    proptest! {
        #[test]
        fn week_runs_monday_to_sunday(offset in 0i64..20_000) {
            let today = d(1990, 1, 1) + chrono::Duration::days(offset);
            let (start, end) = Period::ThisWeek.resolve(today).unwrap().bounds().unwrap();
            prop_assert_eq!(start.weekday(), Weekday::Mon);
            prop_assert_eq!(end.weekday(), Weekday::Sun);
            prop_assert_eq!((end - start).num_days(), 6);
            prop_assert!(start <= today && today <= end);
        }
    }
}
