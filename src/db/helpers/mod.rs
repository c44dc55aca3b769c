use std::convert::TryFrom;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;

use crate::db::models::DATE_FORMAT;

pub fn to_i64(value: u64) -> Result<i64> {
    i64::try_from(value).map_err(|_| anyhow!("value {value} exceeds SQLite INTEGER range"))
}

pub fn to_u64(value: i64, field: &str) -> Result<u64> {
    u64::try_from(value).map_err(|_| anyhow!("{field} contains negative value {value}"))
}

pub fn parse_date(value: &str, field: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .with_context(|| format!("failed to parse {field} '{value}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_reject_out_of_range() {
        assert!(to_i64(u64::MAX).is_err());
        assert_eq!(to_i64(42).unwrap(), 42);
        assert!(to_u64(-1, "duration_secs").is_err());
        assert_eq!(to_u64(5, "duration_secs").unwrap(), 5);
    }

    #[test]
    fn dates_must_be_iso() {
        assert_eq!(
            parse_date("2025-01-11", "trip_date").unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 11).unwrap()
        );
        assert!(parse_date("11/01/2025", "trip_date").is_err());
    }
}
