use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{
    db::models::{format_time, TripDraft},
    error::TrackerError,
    estimation::{adjusted_mileage, fuel_for_distance},
    location::LocationSample,
    settings::TrackingSettings,
};

const MPS_TO_KMH: f64 = 3.6;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TrackingStatus {
    #[default]
    Idle,
    Running,
    Paused,
}

/// Outcome of a successful start request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartKind {
    Fresh,
    Resumed,
}

/// Live state of the one trip being tracked. Mutated only while `Running`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripState {
    pub status: TrackingStatus,
    pub session_id: Option<String>,
    pub started_at: Option<NaiveDateTime>,
    pub elapsed_secs: u64,
    pub distance_m: f64,
    pub fuel_liters: f64,
    pub current_speed_kmh: f64,
    pub max_speed_kmh: f64,
    pub baseline_mileage_kml: Option<f64>,
    /// Baseline in force when the trip was started, recorded as its set mileage.
    pub trip_baseline_kml: Option<f64>,
    pub current_adjusted_mileage_kml: Option<f64>,
    #[serde(skip)]
    mileage_sum: f64,
    #[serde(skip)]
    mileage_readings: u32,
    /// Distance covered since fuel was last charged.
    #[serde(skip)]
    pending_fuel_distance_m: f64,
    #[serde(skip)]
    last_position: Option<LocationSample>,
}

impl TripState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.status == TrackingStatus::Running
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_m / 1000.0
    }

    pub fn last_position(&self) -> Option<&LocationSample> {
        self.last_position.as_ref()
    }

    pub fn mileage_readings(&self) -> u32 {
        self.mileage_readings
    }

    /// Mean of every adjusted-mileage reading taken so far, 0 without readings.
    pub fn real_mileage_kml(&self) -> f64 {
        if self.mileage_readings > 0 {
            self.mileage_sum / f64::from(self.mileage_readings)
        } else {
            0.0
        }
    }

    pub fn avg_speed_kmh(&self) -> f64 {
        let km = self.distance_km();
        if self.elapsed_secs > 0 && km > 0.0 {
            km / (self.elapsed_secs as f64 / 3600.0)
        } else {
            0.0
        }
    }

    /// Install or clear the baseline. Readings already folded into the mean
    /// keep the baseline they were taken with.
    pub fn set_baseline(&mut self, baseline: Option<f64>) {
        self.baseline_mileage_kml = baseline;
        self.current_adjusted_mileage_kml = baseline.map(|base| {
            let speed = if self.is_running() {
                self.current_speed_kmh
            } else {
                0.0
            };
            adjusted_mileage(speed, base)
        });
    }

    pub fn begin(&mut self, session_id: String, now: NaiveDateTime) -> Result<StartKind, TrackerError> {
        if self.is_running() {
            return Err(TrackerError::AlreadyRunning);
        }
        if !self.baseline_mileage_kml.is_some_and(|base| base > 0.0) {
            return Err(TrackerError::MissingBaseline);
        }

        let kind = if self.elapsed_secs == 0 {
            let baseline = self.baseline_mileage_kml;
            *self = Self {
                session_id: Some(session_id),
                started_at: Some(now),
                trip_baseline_kml: baseline,
                ..Self::default()
            };
            self.set_baseline(baseline);
            StartKind::Fresh
        } else {
            StartKind::Resumed
        };

        self.status = TrackingStatus::Running;
        Ok(kind)
    }

    pub fn pause(&mut self) -> Result<(), TrackerError> {
        if !self.is_running() {
            return Err(TrackerError::NotRunning);
        }
        self.status = TrackingStatus::Paused;
        self.current_speed_kmh = 0.0;
        Ok(())
    }

    /// One second of riding time.
    pub fn tick(&mut self) {
        if self.is_running() {
            self.elapsed_secs = self.elapsed_secs.saturating_add(1);
        }
    }

    /// Fold one fix into the running totals. Returns `false` when the fix was
    /// ignored because the trip is not running.
    pub fn apply_sample(&mut self, sample: &LocationSample, settings: &TrackingSettings) -> bool {
        if !self.is_running() {
            return false;
        }

        let speed_kmh = self.speed_for(sample, settings) * MPS_TO_KMH;
        self.current_speed_kmh = speed_kmh;
        if speed_kmh > self.max_speed_kmh {
            self.max_speed_kmh = speed_kmh;
        }

        if let Some(base) = self.baseline_mileage_kml {
            let adjusted = adjusted_mileage(speed_kmh, base);
            self.current_adjusted_mileage_kml = Some(adjusted);
            self.mileage_sum += adjusted;
            self.mileage_readings += 1;
        }

        if let Some(previous) = self.last_position {
            if sample.accuracy_m < settings.accuracy_limit_m {
                let segment_m = previous.distance_to(sample);
                self.distance_m += segment_m;
                self.charge_fuel(segment_m, settings.fuel_quantum_m);
            }
        }

        self.last_position = Some(*sample);
        true
    }

    fn charge_fuel(&mut self, segment_m: f64, quantum_m: f64) {
        let Some(adjusted) = self
            .current_adjusted_mileage_kml
            .filter(|mileage| self.baseline_mileage_kml.is_some() && *mileage > 0.0)
        else {
            return;
        };

        self.pending_fuel_distance_m += segment_m;
        if self.pending_fuel_distance_m >= quantum_m {
            self.fuel_liters += fuel_for_distance(self.pending_fuel_distance_m / 1000.0, adjusted);
            self.pending_fuel_distance_m = 0.0;
        }
    }

    /// Ground speed in m/s: trusted provider speed, else derived from the
    /// previous fix, else standing still.
    fn speed_for(&self, sample: &LocationSample, settings: &TrackingSettings) -> f64 {
        if let (Some(speed), Some(accuracy)) = (sample.speed_mps, sample.speed_accuracy_mps) {
            if accuracy > 0.0 && speed > settings.min_reported_speed_mps {
                return speed;
            }
        }

        let derived = self
            .last_position
            .map(|previous| {
                let dt = sample.seconds_since(&previous);
                if dt > settings.min_derivation_interval_secs {
                    previous.distance_to(sample) / dt
                } else {
                    0.0
                }
            })
            .unwrap_or(0.0);

        if derived < settings.stationary_speed_mps {
            0.0
        } else {
            derived
        }
    }

    /// Build the record for this trip without touching the state.
    pub fn to_draft(&self, ended_at: NaiveDateTime) -> Result<TripDraft, TrackerError> {
        let started_at = self.started_at.ok_or(TrackerError::NotStarted)?;
        if self.baseline_mileage_kml.is_none() {
            return Err(TrackerError::MissingBaseline);
        }
        let set_mileage = self
            .trip_baseline_kml
            .ok_or(TrackerError::MissingBaseline)?;

        Ok(TripDraft {
            date: started_at.date(),
            start_time: format_time(started_at.time()),
            end_time: format_time(ended_at.time()),
            duration_secs: self.elapsed_secs,
            distance_km: self.distance_km(),
            avg_speed_kmh: self.avg_speed_kmh(),
            max_speed_kmh: self.max_speed_kmh,
            fuel_liters: self.fuel_liters,
            set_mileage_kml: set_mileage,
            real_mileage_kml: self.real_mileage_kml(),
        })
    }

    /// Drop everything, including the baseline.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
