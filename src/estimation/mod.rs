mod mileage;

pub use mileage::{adjusted_mileage, degradation_for, fuel_for_distance, MILEAGE_FLOOR_KML};

use crate::error::TrackerError;

/// Parse a rider-entered baseline such as `"42.5"`.
pub fn parse_baseline_mileage(input: &str) -> Result<f64, TrackerError> {
    let trimmed = input.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(TrackerError::InvalidMileage(trimmed.to_string())),
    }
}
