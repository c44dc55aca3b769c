use chrono::{Days, Duration, NaiveDate, NaiveTime};
use rand::Rng;

use crate::{
    db::{models::format_time, TripDraft},
    estimation::{adjusted_mileage, fuel_for_distance},
};

const HISTORY_DAYS: u64 = 90;

/// Plausible rides spread over the last ninety days, oldest first.
pub fn demo_trips<R: Rng>(rng: &mut R, count: usize, today: NaiveDate) -> Vec<TripDraft> {
    let mut trips: Vec<TripDraft> = (0..count).map(|_| demo_trip(rng, today)).collect();
    trips.sort_by(|a, b| (a.date, &a.start_time).cmp(&(b.date, &b.start_time)));
    trips
}

fn demo_trip<R: Rng>(rng: &mut R, today: NaiveDate) -> TripDraft {
    let date = today - Days::new(rng.gen_range(0..HISTORY_DAYS));
    let start = NaiveTime::from_hms_opt(
        rng.gen_range(5..23),
        rng.gen_range(0..60),
        rng.gen_range(0..60),
    )
    .unwrap_or(NaiveTime::MIN);
    let duration_secs: u64 = rng.gen_range(5 * 60..90 * 60);
    let (end, _) = start.overflowing_add_signed(Duration::seconds(duration_secs as i64));

    let avg_speed_kmh: f64 = rng.gen_range(15.0..85.0);
    let distance_km = avg_speed_kmh * duration_secs as f64 / 3600.0;
    let set_mileage_kml = (rng.gen_range(30.0_f64..55.0) * 10.0).round() / 10.0;
    let real_mileage_kml = adjusted_mileage(avg_speed_kmh, set_mileage_kml);

    TripDraft {
        date,
        start_time: format_time(start),
        end_time: format_time(end),
        duration_secs,
        distance_km,
        avg_speed_kmh,
        max_speed_kmh: avg_speed_kmh * rng.gen_range(1.1..1.6),
        fuel_liters: fuel_for_distance(distance_km, real_mileage_kml),
        set_mileage_kml,
        real_mileage_kml,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn demo_trips_are_consistent() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let trips = demo_trips(&mut rng, 40, today);

        assert_eq!(trips.len(), 40);
        assert!(trips.windows(2).all(|w| w[0].date <= w[1].date));
        for trip in &trips {
            assert!(trip.date <= today);
            assert!((today - trip.date).num_days() < HISTORY_DAYS as i64);
            assert!(trip.max_speed_kmh > trip.avg_speed_kmh);
            assert!(trip.real_mileage_kml <= trip.set_mileage_kml);
            assert!(trip.fuel_liters > 0.0);
            let implied = trip.distance_km / (trip.duration_secs as f64 / 3600.0);
            assert!((implied - trip.avg_speed_kmh).abs() < 1e-9);
        }
    }

    #[test]
    fn same_seed_same_trips() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        let a = demo_trips(&mut StdRng::seed_from_u64(1), 5, today);
        let b = demo_trips(&mut StdRng::seed_from_u64(1), 5, today);
        assert_eq!(a, b);
    }
}
