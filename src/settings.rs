use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

/// Sensor thresholds used by the live accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingSettings {
    /// Fixes at or above this horizontal accuracy do not add distance.
    pub accuracy_limit_m: f64,
    /// Distance that must accumulate before fuel is charged for it.
    pub fuel_quantum_m: f64,
    /// Shortest gap between fixes used to derive speed.
    pub min_derivation_interval_secs: f64,
    /// Reported speeds at or below this are not trusted.
    pub min_reported_speed_mps: f64,
    /// Derived speeds below this count as standing still.
    pub stationary_speed_mps: f64,
}

impl Default for TrackingSettings {
    fn default() -> Self {
        Self {
            accuracy_limit_m: 30.0,
            fuel_quantum_m: 5.0,
            min_derivation_interval_secs: 0.5,
            min_reported_speed_mps: 0.05,
            stationary_speed_mps: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionSettings {
    pub horizon_days: u32,
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self { horizon_days: 30 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub tracking: TrackingSettings,
    pub projection: ProjectionSettings,
}

pub struct SettingsStore {
    path: Option<PathBuf>,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    /// Load settings from `path`, falling back to defaults when the file is
    /// missing or unreadable as JSON.
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!(
                    "Ignoring malformed settings in {}: {err}",
                    path.display()
                );
                UserSettings::default()
            })
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path: Some(path),
            data: RwLock::new(data),
        })
    }

    /// Settings that live only in memory.
    pub fn ephemeral(settings: UserSettings) -> Self {
        Self {
            path: None,
            data: RwLock::new(settings),
        }
    }

    pub fn tracking(&self) -> TrackingSettings {
        self.read().tracking
    }

    pub fn projection(&self) -> ProjectionSettings {
        self.read().projection
    }

    pub fn snapshot(&self) -> UserSettings {
        self.read().clone()
    }

    pub fn update_projection(&self, projection: ProjectionSettings) -> Result<()> {
        let mut guard = self.write();
        guard.projection = projection;
        self.persist(&guard)
    }

    fn read(&self) -> RwLockReadGuard<'_, UserSettings> {
        match self.data.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, UserSettings> {
        match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(path, serialized)
            .with_context(|| format!("Failed to write settings to {}", path.display()))
    }
}
