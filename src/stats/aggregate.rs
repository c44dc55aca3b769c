use log::debug;
use serde::Serialize;

use crate::db::TripRecord;

pub const SPEED_BUCKET_WIDTH_KMH: f64 = 5.0;
pub const SPEED_BUCKET_COUNT: usize = 16;

/// Bucket for an average speed. The last bucket is open above; anything
/// below zero or NaN lands in the first one.
pub fn bucket_index(avg_speed_kmh: f64) -> usize {
    if avg_speed_kmh.is_nan() || avg_speed_kmh <= 0.0 {
        return 0;
    }
    let index = (avg_speed_kmh / SPEED_BUCKET_WIDTH_KMH).floor();
    if index >= (SPEED_BUCKET_COUNT - 1) as f64 {
        SPEED_BUCKET_COUNT - 1
    } else {
        index as usize
    }
}

pub fn bucket_label(index: usize) -> String {
    let lower = index as f64 * SPEED_BUCKET_WIDTH_KMH;
    if index >= SPEED_BUCKET_COUNT - 1 {
        format!("{lower:.0}+")
    } else {
        format!("{lower:.0}-{:.0}", lower + SPEED_BUCKET_WIDTH_KMH)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedBucket {
    pub label: String,
    pub trips: usize,
    pub avg_real_mileage_kml: f64,
}

/// Mean real mileage per average-speed bucket. Always carries all sixteen
/// buckets; see [`speed_efficiency`] for when it is produced at all.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeedEfficiencyChart {
    pub buckets: Vec<SpeedBucket>,
}

/// `None` when no bucket has a positive mean, i.e. there is nothing to plot.
pub fn speed_efficiency(records: &[TripRecord]) -> Option<SpeedEfficiencyChart> {
    let mut sums = [0.0_f64; SPEED_BUCKET_COUNT];
    let mut counts = [0_usize; SPEED_BUCKET_COUNT];

    for record in records.iter().filter(|r| r.real_mileage_kml > 0.0) {
        let index = bucket_index(record.avg_speed_kmh);
        sums[index] += record.real_mileage_kml;
        counts[index] += 1;
    }

    let buckets: Vec<SpeedBucket> = (0..SPEED_BUCKET_COUNT)
        .map(|index| SpeedBucket {
            label: bucket_label(index),
            trips: counts[index],
            avg_real_mileage_kml: if counts[index] > 0 {
                sums[index] / counts[index] as f64
            } else {
                0.0
            },
        })
        .collect();

    if buckets.iter().all(|bucket| bucket.avg_real_mileage_kml == 0.0) {
        return None;
    }
    Some(SpeedEfficiencyChart { buckets })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceDurationPoint {
    pub distance_km: f64,
    pub duration_minutes: f64,
}

/// One point per trip that actually moved, sorted by distance.
pub fn distance_vs_duration(records: &[TripRecord]) -> Vec<DistanceDurationPoint> {
    let mut points: Vec<DistanceDurationPoint> = records
        .iter()
        .filter(|r| r.distance_km > 0.0 && r.duration_secs > 0)
        .map(|r| DistanceDurationPoint {
            distance_km: r.distance_km,
            duration_minutes: r.duration_minutes(),
        })
        .collect();
    points.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    points
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TimeOfDay {
    Morning,
    Midday,
    Evening,
    Night,
}

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 4] = [
        TimeOfDay::Morning,
        TimeOfDay::Midday,
        TimeOfDay::Evening,
        TimeOfDay::Night,
    ];

    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=9 => TimeOfDay::Morning,
            10..=15 => TimeOfDay::Midday,
            16..=19 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "Morning",
            TimeOfDay::Midday => "Midday",
            TimeOfDay::Evening => "Evening",
            TimeOfDay::Night => "Night",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeOfDayCount {
    pub band: TimeOfDay,
    pub trips: usize,
}

/// Trips per start-time band in fixed band order, empty bands left out.
pub fn time_of_day_counts(records: &[TripRecord]) -> Vec<TimeOfDayCount> {
    let mut counts = [0_usize; 4];
    for record in records {
        let Some(hour) = record.start_hour() else {
            debug!(
                "skipping trip {} with unreadable start time '{}'",
                record.id, record.start_time
            );
            continue;
        };
        let band = TimeOfDay::from_hour(hour);
        counts[band as usize] += 1;
    }

    TimeOfDay::ALL
        .into_iter()
        .zip(counts)
        .filter(|(_, trips)| *trips > 0)
        .map(|(band, trips)| TimeOfDayCount { band, trips })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use rstest::rstest;

    fn trip(id: i64, start: &str, avg_speed: f64, km: f64, secs: u64, real: f64) -> TripRecord {
        TripRecord {
            id,
            date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            start_time: start.into(),
            end_time: "23:00:00".into(),
            duration_secs: secs,
            distance_km: km,
            avg_speed_kmh: avg_speed,
            max_speed_kmh: avg_speed * 1.5,
            fuel_liters: 0.1,
            set_mileage_kml: 40.0,
            real_mileage_kml: real,
        }
    }

    #[rstest]
    #[case(0.0, 0)]
    #[case(4.999, 0)]
    #[case(5.0, 1)]
    #[case(72.0, 14)]
    #[case(75.0, 15)]
    #[case(180.0, 15)]
    fn buckets_are_five_kmh_wide(#[case] speed: f64, #[case] expected: usize) {
        assert_eq!(bucket_index(speed), expected);
    }

    #[test]
    fn labels_cover_the_open_bucket() {
        assert_eq!(bucket_label(0), "0-5");
        assert_eq!(bucket_label(14), "70-75");
        assert_eq!(bucket_label(15), "75+");
    }

    proptest! {
        #[test]
        fn every_speed_lands_in_one_bucket(speed in 0.0f64..1_000.0) {
            let index = bucket_index(speed);
            prop_assert!(index < SPEED_BUCKET_COUNT);
            let lower = index as f64 * SPEED_BUCKET_WIDTH_KMH;
            prop_assert!(speed >= lower);
            if index < SPEED_BUCKET_COUNT - 1 {
                prop_assert!(speed < lower + SPEED_BUCKET_WIDTH_KMH);
            }
        }
    }

    #[test]
    fn bucket_mean_ignores_zero_readings() {
        let records = vec![
            trip(1, "08:00:00", 22.0, 5.0, 600, 40.0),
            trip(2, "08:00:00", 23.0, 5.0, 600, 30.0),
            trip(3, "08:00:00", 24.0, 5.0, 600, 0.0),
            trip(4, "08:00:00", 90.0, 5.0, 600, 27.0),
        ];
        let chart = speed_efficiency(&records).unwrap();
        assert_eq!(chart.buckets.len(), SPEED_BUCKET_COUNT);
        assert_eq!(chart.buckets[4].trips, 2);
        assert_eq!(chart.buckets[4].avg_real_mileage_kml, 35.0);
        assert_eq!(chart.buckets[15].avg_real_mileage_kml, 27.0);
        assert_eq!(chart.buckets[0].avg_real_mileage_kml, 0.0);
    }

    #[test]
    fn no_positive_mileage_means_no_chart() {
        let records = vec![trip(1, "08:00:00", 22.0, 5.0, 600, 0.0)];
        assert_eq!(speed_efficiency(&records), None);
        assert_eq!(speed_efficiency(&[]), None);
    }

    #[test]
    fn scatter_skips_idle_trips_and_sorts() {
        let records = vec![
            trip(1, "08:00:00", 20.0, 12.0, 1_800, 40.0),
            trip(2, "08:00:00", 20.0, 0.0, 600, 40.0),
            trip(3, "08:00:00", 20.0, 3.0, 0, 40.0),
            trip(4, "08:00:00", 20.0, 4.0, 720, 40.0),
        ];
        let points = distance_vs_duration(&records);
        assert_eq!(
            points,
            vec![
                DistanceDurationPoint { distance_km: 4.0, duration_minutes: 12.0 },
                DistanceDurationPoint { distance_km: 12.0, duration_minutes: 30.0 },
            ]
        );
    }

    #[rstest]
    #[case(5, TimeOfDay::Night)]
    #[case(6, TimeOfDay::Morning)]
    #[case(9, TimeOfDay::Morning)]
    #[case(10, TimeOfDay::Midday)]
    #[case(15, TimeOfDay::Midday)]
    #[case(16, TimeOfDay::Evening)]
    #[case(19, TimeOfDay::Evening)]
    #[case(20, TimeOfDay::Night)]
    #[case(0, TimeOfDay::Night)]
    fn hours_map_to_bands(#[case] hour: u32, #[case] band: TimeOfDay) {
        assert_eq!(TimeOfDay::from_hour(hour), band);
    }

    #[test]
    fn band_counts_skip_unreadable_times_and_empty_bands() {
        let records = vec![
            trip(1, "07:15:00", 20.0, 1.0, 60, 40.0),
            trip(2, "08:45:10", 20.0, 1.0, 60, 40.0),
            trip(3, "22:00:00", 20.0, 1.0, 60, 40.0),
            trip(4, "quarter past", 20.0, 1.0, 60, 40.0),
        ];
        assert_eq!(
            time_of_day_counts(&records),
            vec![
                TimeOfDayCount { band: TimeOfDay::Morning, trips: 2 },
                TimeOfDayCount { band: TimeOfDay::Night, trips: 1 },
            ]
        );
    }
}
