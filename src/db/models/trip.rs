//! Persisted trip models.
//!
//! Dates are kept as `NaiveDate` and written as `YYYY-MM-DD`; start and end
//! times stay in their stored `HH:MM:SS` text form so a single malformed row
//! cannot poison a whole listing.

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// A finished ride that has not been given an id yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripDraft {
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub duration_secs: u64,
    pub distance_km: f64,
    pub avg_speed_kmh: f64,
    pub max_speed_kmh: f64,
    pub fuel_liters: f64,
    pub set_mileage_kml: f64,
    pub real_mileage_kml: f64,
}

impl TripDraft {
    pub fn with_id(self, id: i64) -> TripRecord {
        TripRecord {
            id,
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            duration_secs: self.duration_secs,
            distance_km: self.distance_km,
            avg_speed_kmh: self.avg_speed_kmh,
            max_speed_kmh: self.max_speed_kmh,
            fuel_liters: self.fuel_liters,
            set_mileage_kml: self.set_mileage_kml,
            real_mileage_kml: self.real_mileage_kml,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRecord {
    pub id: i64,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub duration_secs: u64,
    pub distance_km: f64,
    pub avg_speed_kmh: f64,
    pub max_speed_kmh: f64,
    pub fuel_liters: f64,
    pub set_mileage_kml: f64,
    pub real_mileage_kml: f64,
}

impl TripRecord {
    /// Hour of day the trip started, `None` when the stored time is not
    /// `HH:MM:SS` shaped.
    pub fn start_hour(&self) -> Option<u32> {
        NaiveTime::parse_from_str(&self.start_time, TIME_FORMAT)
            .ok()
            .map(|time| time.hour())
    }

    pub fn duration_minutes(&self) -> f64 {
        self.duration_secs as f64 / 60.0
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}
