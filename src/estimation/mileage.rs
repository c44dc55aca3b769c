/// Lowest mileage ever reported, keeps fuel division finite.
pub const MILEAGE_FLOOR_KML: f64 = 0.01;

/// Speed tiers (inclusive upper bound in km/h) and the fractional mileage
/// drop applied inside each tier. Anything faster than the last bound gets
/// `TOP_SPEED_DROP`.
const DEGRADATION_TIERS: [(f64, f64); 6] = [
    (55.0, 0.0),
    (65.0, 0.05),
    (75.0, 0.10),
    (97.0, 0.17),
    (121.0, 0.225),
    (137.0, 0.275),
];

const TOP_SPEED_DROP: f64 = 0.335;

/// Fraction of the baseline mileage lost at `speed_kmh`.
pub fn degradation_for(speed_kmh: f64) -> f64 {
    DEGRADATION_TIERS
        .iter()
        .find(|(upper, _)| speed_kmh <= *upper)
        .map(|(_, drop)| *drop)
        .unwrap_or(TOP_SPEED_DROP)
}

/// Effective km/L at the given speed, never below [`MILEAGE_FLOOR_KML`].
pub fn adjusted_mileage(current_speed_kmh: f64, base_mileage_kml: f64) -> f64 {
    let adjusted = base_mileage_kml * (1.0 - degradation_for(current_speed_kmh));
    if adjusted > MILEAGE_FLOOR_KML {
        adjusted
    } else {
        MILEAGE_FLOOR_KML
    }
}

/// Liters burned covering `distance_km` at `mileage_kml`.
pub fn fuel_for_distance(distance_km: f64, mileage_kml: f64) -> f64 {
    if distance_km <= 0.0 {
        return 0.0;
    }
    distance_km / mileage_kml.max(MILEAGE_FLOOR_KML)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(30.0, 40.0)]
    #[case(55.0, 40.0)]
    #[case(60.0, 38.0)]
    #[case(70.0, 36.0)]
    #[case(80.0, 33.2)]
    #[case(100.0, 31.0)]
    #[case(130.0, 29.0)]
    #[case(150.0, 26.6)]
    fn tiers_match_table(#[case] speed: f64, #[case] expected: f64) {
        assert!((adjusted_mileage(speed, 40.0) - expected).abs() < 1e-9);
    }

    #[test]
    fn zero_baseline_hits_the_floor() {
        assert_eq!(adjusted_mileage(20.0, 0.0), MILEAGE_FLOOR_KML);
        assert_eq!(adjusted_mileage(200.0, 0.001), MILEAGE_FLOOR_KML);
    }

    #[test]
    fn fuel_is_distance_over_mileage() {
        assert!((fuel_for_distance(10.0, 40.0) - 0.25).abs() < 1e-12);
        assert_eq!(fuel_for_distance(0.0, 40.0), 0.0);
    }

    proptest! {
        #[test]
        fn below_fifty_five_is_baseline(speed in 0.0f64..=55.0, base in 0.1f64..200.0) {
            prop_assert_eq!(adjusted_mileage(speed, base), base);
        }

        #[test]
        fn never_below_floor(speed in -10.0f64..400.0, base in 0.0001f64..500.0) {
            prop_assert!(adjusted_mileage(speed, base) >= MILEAGE_FLOOR_KML);
        }

        #[test]
        fn faster_is_never_more_efficient(a in 0.0f64..300.0, b in 0.0f64..300.0, base in 1.0f64..100.0) {
            let (slow, fast) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(adjusted_mileage(fast, base) <= adjusted_mileage(slow, base));
        }
    }
}
