use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// One fix delivered by a location provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationSample {
    pub latitude: f64,
    pub longitude: f64,
    /// Provider-reported ground speed in m/s, if any.
    #[serde(default)]
    pub speed_mps: Option<f64>,
    /// Provider's 1-sigma bound on `speed_mps`.
    #[serde(default)]
    pub speed_accuracy_mps: Option<f64>,
    /// Horizontal accuracy radius in meters.
    pub accuracy_m: f64,
    pub timestamp: DateTime<Utc>,
}

impl LocationSample {
    pub fn new(latitude: f64, longitude: f64, accuracy_m: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            speed_mps: None,
            speed_accuracy_mps: None,
            accuracy_m,
            timestamp,
        }
    }

    pub fn with_speed(mut self, speed_mps: f64, speed_accuracy_mps: f64) -> Self {
        self.speed_mps = Some(speed_mps);
        self.speed_accuracy_mps = Some(speed_accuracy_mps);
        self
    }

    /// Great-circle distance to `other` in meters.
    pub fn distance_to(&self, other: &LocationSample) -> f64 {
        haversine_m(self.latitude, self.longitude, other.latitude, other.longitude)
    }

    /// Seconds elapsed since `earlier`; negative when fixes arrive out of order.
    pub fn seconds_since(&self, earlier: &LocationSample) -> f64 {
        (self.timestamp - earlier.timestamp).num_milliseconds() as f64 / 1000.0
    }
}

pub fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let d = haversine_m(0.0, 0.0, 1.0, 0.0);
        assert!((d - 111_195.0).abs() < 50.0, "got {d}");
    }

    #[test]
    fn same_point_is_zero() {
        assert_eq!(haversine_m(48.1, 11.5, 48.1, 11.5), 0.0);
    }

    #[test]
    fn seconds_since_uses_timestamps() {
        let t0 = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();
        let a = LocationSample::new(0.0, 0.0, 5.0, t0);
        let b = LocationSample::new(0.0, 0.0, 5.0, t0 + chrono::Duration::milliseconds(2500));
        assert_eq!(b.seconds_since(&a), 2.5);
    }
}
