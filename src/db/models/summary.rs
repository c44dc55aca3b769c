use serde::{Deserialize, Serialize};

/// Totals for all trips inside one date range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSummary {
    pub trip_count: u64,
    pub total_fuel_liters: f64,
    pub total_distance_km: f64,
    /// Mean real mileage; `None` when there is nothing meaningful to show.
    pub avg_real_mileage_kml: Option<f64>,
}

impl PeriodSummary {
    /// Build a summary from raw SQL aggregates, where SUM and AVG are NULL
    /// over an empty set.
    pub fn from_aggregates(
        trip_count: u64,
        fuel: Option<f64>,
        distance: Option<f64>,
        avg_real_mileage: Option<f64>,
    ) -> Self {
        Self {
            trip_count,
            total_fuel_liters: fuel.unwrap_or(0.0),
            total_distance_km: distance.unwrap_or(0.0),
            avg_real_mileage_kml: avg_real_mileage
                .filter(|avg| trip_count > 0 && *avg > 0.0),
        }
    }
}
