use serde::Serialize;

use crate::db::TripRecord;

/// Expected riding over the next `horizon_days`, extrapolated from the
/// per-day averages of the whole history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub horizon_days: u32,
    pub history_span_days: i64,
    pub rides: f64,
    pub distance_km: f64,
    pub fuel_liters: f64,
    /// Historical distance per liter, not a trend.
    pub efficiency_kml: f64,
}

/// `None` when fewer than two trips exist.
pub fn project(history: &[TripRecord], horizon_days: u32) -> Option<Projection> {
    if history.len() < 2 {
        return None;
    }

    let first = history.iter().map(|r| r.date).min()?;
    let last = history.iter().map(|r| r.date).max()?;
    let span_days = ((last - first).num_days() + 1).max(1);

    let total_distance: f64 = history.iter().map(|r| r.distance_km).sum();
    let total_fuel: f64 = history.iter().map(|r| r.fuel_liters).sum();
    let horizon = f64::from(horizon_days);
    let per_day = |total: f64| (total / span_days as f64 * horizon).max(0.0);

    Some(Projection {
        horizon_days,
        history_span_days: span_days,
        rides: per_day(history.len() as f64),
        distance_km: per_day(total_distance),
        fuel_liters: per_day(total_fuel),
        efficiency_kml: if total_fuel > 0.0 {
            (total_distance / total_fuel).max(0.0)
        } else {
            0.0
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn trip(date: (i32, u32, u32), km: f64, fuel: f64) -> TripRecord {
        TripRecord {
            id: 0,
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            start_time: "09:00:00".into(),
            end_time: "09:30:00".into(),
            duration_secs: 1_800,
            distance_km: km,
            avg_speed_kmh: km * 2.0,
            max_speed_kmh: km * 3.0,
            fuel_liters: fuel,
            set_mileage_kml: 40.0,
            real_mileage_kml: 38.0,
        }
    }

    #[test]
    fn needs_two_trips() {
        assert_eq!(project(&[], 30), None);
        assert_eq!(project(&[trip((2025, 1, 1), 50.0, 2.5)], 30), None);
    }

    #[test]
    fn extrapolates_per_day_averages() {
        let history = [trip((2025, 1, 1), 50.0, 2.5), trip((2025, 1, 11), 50.0, 2.5)];
        let projection = project(&history, 30).unwrap();

        assert_eq!(projection.history_span_days, 11);
        assert!((projection.distance_km - 100.0 / 11.0 * 30.0).abs() < 1e-9);
        assert!((projection.distance_km - 272.7).abs() < 0.05);
        assert!((projection.rides - 2.0 / 11.0 * 30.0).abs() < 1e-9);
        assert!((projection.fuel_liters - 5.0 / 11.0 * 30.0).abs() < 1e-9);
        assert_eq!(projection.efficiency_kml, 20.0);
    }

    #[test]
    fn efficiency_does_not_depend_on_horizon() {
        let history = [trip((2025, 1, 1), 50.0, 2.5), trip((2025, 1, 11), 50.0, 2.5)];
        for horizon in [1, 7, 30, 365] {
            assert_eq!(project(&history, horizon).unwrap().efficiency_kml, 20.0);
        }
    }

    #[test]
    fn same_day_history_spans_one_day() {
        let history = [trip((2025, 2, 3), 10.0, 0.0), trip((2025, 2, 3), 20.0, 0.0)];
        let projection = project(&history, 30).unwrap();
        assert_eq!(projection.history_span_days, 1);
        assert_eq!(projection.distance_km, 900.0);
        assert_eq!(projection.efficiency_kml, 0.0);
    }
}
