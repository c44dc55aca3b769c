use chrono::NaiveDate;
use thiserror::Error;

/// Domain failures that are reported to the rider instead of crashing the
/// triggering operation. Infrastructure failures travel as `anyhow::Error`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TrackerError {
    #[error("set a valid mileage first")]
    MissingBaseline,
    #[error("invalid mileage '{0}': must be a positive number")]
    InvalidMileage(String),
    #[error("start a trip first")]
    NotStarted,
    #[error("a trip is already running")]
    AlreadyRunning,
    #[error("no trip is running")]
    NotRunning,
    #[error("invalid date range: {start} is after {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}
