pub mod clock;
pub mod db;
pub mod error;
pub mod estimation;
pub mod location;
pub mod seed;
pub mod settings;
pub mod stats;
pub mod tracking;
mod utils;

use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use log::info;

use clock::{Clock, SystemClock};
use db::Database;
use location::LocationSource;
use settings::SettingsStore;
use tracking::TrackerController;

pub use utils::logging::init_logging;

const DB_FILE_NAME: &str = "rideistics.sqlite3";
const SETTINGS_FILE_NAME: &str = "settings.json";

/// Shared handles for one process: the trip database and the settings file.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub settings: Arc<SettingsStore>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn open(db_path: Option<PathBuf>, settings_path: Option<PathBuf>) -> Result<Self> {
        let data_dir = default_data_dir();
        let db_path = db_path.unwrap_or_else(|| data_dir.join(DB_FILE_NAME));
        let settings_path = settings_path.unwrap_or_else(|| data_dir.join(SETTINGS_FILE_NAME));

        let db = Database::new(db_path)?;
        let settings = SettingsStore::new(settings_path)?;
        info!("Rideistics state ready");

        Ok(Self {
            db,
            settings: Arc::new(settings),
            clock: Arc::new(SystemClock),
        })
    }

    pub fn tracker(&self, source: Arc<dyn LocationSource>) -> TrackerController {
        TrackerController::new(
            Arc::new(self.db.clone()),
            source,
            self.settings.clone(),
            self.clock.clone(),
        )
    }
}

/// `$RIDEISTICS_HOME`, or `.rideistics` under the working directory.
pub fn default_data_dir() -> PathBuf {
    std::env::var_os("RIDEISTICS_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(".rideistics"))
}
