use std::{sync::Arc, time::Duration};

use anyhow::Result;
use log::{error, info, warn};
use serde::Serialize;
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
    time::{self, Instant},
};
use uuid::Uuid;

use crate::{
    clock::Clock,
    db::{TripRecord, TripStore},
    error::TrackerError,
    estimation::parse_baseline_mileage,
    location::{LocationController, LocationSource},
    settings::SettingsStore,
};

use super::{StartKind, TrackingStatus, TripState};

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerSnapshot {
    pub state: TripState,
    pub distance_km: f64,
    pub avg_speed_kmh: f64,
    pub real_mileage_kml: f64,
}

impl From<&TripState> for TrackerSnapshot {
    fn from(state: &TripState) -> Self {
        Self {
            distance_km: state.distance_km(),
            avg_speed_kmh: state.avg_speed_kmh(),
            real_mileage_kml: state.real_mileage_kml(),
            state: state.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum TrackerEvent {
    StateChanged { snapshot: TrackerSnapshot },
    Heartbeat { snapshot: TrackerSnapshot },
    Notice { message: String },
    TripRecorded { trip: TripRecord },
}

#[derive(Clone)]
pub struct TrackerController {
    state: Arc<Mutex<TripState>>,
    store: Arc<dyn TripStore>,
    source: Arc<dyn LocationSource>,
    clock: Arc<dyn Clock>,
    settings: Arc<SettingsStore>,
    events: broadcast::Sender<TrackerEvent>,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    tick_interval: Duration,
    heartbeat_every_ticks: u32,
    location: Arc<Mutex<LocationController>>,
}

impl TrackerController {
    pub fn new(
        store: Arc<dyn TripStore>,
        source: Arc<dyn LocationSource>,
        settings: Arc<SettingsStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let debug_mode = std::env::var("RIDEISTICS_DEBUG")
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            state: Arc::new(Mutex::new(TripState::new())),
            store,
            source,
            clock,
            settings,
            events,
            ticker: Arc::new(Mutex::new(None)),
            tick_interval: Duration::from_secs(1),
            heartbeat_every_ticks: if debug_mode { 1 } else { 10 },
            location: Arc::new(Mutex::new(LocationController::new())),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TrackerEvent> {
        self.events.subscribe()
    }

    pub async fn get_state(&self) -> TripState {
        self.state.lock().await.clone()
    }

    pub async fn get_snapshot(&self) -> TrackerSnapshot {
        TrackerSnapshot::from(&*self.state.lock().await)
    }

    /// Parse and install the rider's baseline. An invalid entry clears any
    /// previous baseline.
    pub async fn set_baseline_mileage(&self, input: &str) -> Result<f64, TrackerError> {
        let parsed = parse_baseline_mileage(input);
        {
            let mut state = self.state.lock().await;
            state.set_baseline(parsed.as_ref().ok().copied());
        }

        match &parsed {
            Ok(value) => info!("Baseline mileage set to {value} km/L"),
            Err(err) => self.notify(err.to_string()),
        }
        self.emit_state_changed().await;
        parsed
    }

    pub async fn start(&self) -> Result<StartKind> {
        let now = self.clock.now();
        let (kind, session_id) = {
            let mut state = self.state.lock().await;
            let kind = match state.begin(Uuid::new_v4().to_string(), now) {
                Ok(kind) => kind,
                Err(err) => {
                    drop(state);
                    self.notify(err.to_string());
                    return Err(err.into());
                }
            };
            (kind, state.session_id.clone().unwrap_or_default())
        };

        let started = self.location.lock().await.start_updates(
            session_id.clone(),
            self.source.as_ref(),
            self.state.clone(),
            self.settings.tracking(),
        );
        if let Err(err) = started {
            // No subscription, no trip: fall back to Paused.
            let mut state = self.state.lock().await;
            let _ = state.pause();
            drop(state);
            self.emit_state_changed().await;
            return Err(err);
        }

        self.spawn_ticker().await;

        match kind {
            StartKind::Fresh => info!("Trip {session_id} started"),
            StartKind::Resumed => info!("Trip {session_id} resumed"),
        }
        self.emit_state_changed().await;
        Ok(kind)
    }

    pub async fn pause(&self) -> Result<()> {
        let paused = self.state.lock().await.pause();
        if let Err(err) = paused {
            self.notify(err.to_string());
            return Err(err.into());
        }

        self.cancel_ticker().await;
        self.location.lock().await.stop_updates().await?;

        info!("Trip paused");
        self.emit_state_changed().await;
        Ok(())
    }

    /// Finalize the current trip, reset the tracker and store the record.
    ///
    /// Returns `Ok(None)` when the record could not be saved; the failure is
    /// logged and published as a notice, and the tracker stays reset.
    pub async fn record_and_reset(&self) -> Result<Option<TripRecord>> {
        let ended_at = self.clock.now();
        let draft = {
            let mut state = self.state.lock().await;
            match state.to_draft(ended_at) {
                Ok(draft) => {
                    state.reset();
                    draft
                }
                Err(err) => {
                    drop(state);
                    self.notify(err.to_string());
                    return Err(err.into());
                }
            }
        };

        self.cancel_ticker().await;
        self.location.lock().await.stop_updates().await?;
        self.emit_state_changed().await;

        match self.store.insert(&draft).await {
            Ok(id) => {
                let record = draft.with_id(id);
                info!(
                    "Recorded trip {id}: {:.2} km in {} s, {:.3} L",
                    record.distance_km, record.duration_secs, record.fuel_liters
                );
                let _ = self.events.send(TrackerEvent::TripRecorded {
                    trip: record.clone(),
                });
                Ok(Some(record))
            }
            Err(err) => {
                error!("Failed to save trip: {err:?}");
                self.notify(format!("could not save trip: {err}"));
                Ok(None)
            }
        }
    }

    /// Resolves once the location provider has delivered its last fix, or
    /// immediately when no updates are active.
    pub async fn wait_for_source_end(&self) {
        let signal = self.location.lock().await.exhausted_signal();
        if let Some(mut rx) = signal {
            // A closed channel means updates were stopped, which also ends the wait.
            let _ = rx.wait_for(|exhausted| *exhausted).await;
        }
    }

    async fn spawn_ticker(&self) {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(handle) = ticker_guard.take() {
            handle.abort();
        }

        let state = self.state.clone();
        let events = self.events.clone();
        let tick_interval = self.tick_interval;
        let heartbeat_every = self.heartbeat_every_ticks.max(1);

        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + tick_interval, tick_interval);
            let mut ticks: u32 = 0;
            loop {
                interval.tick().await;

                let snapshot = {
                    let mut guard = state.lock().await;
                    if guard.status != TrackingStatus::Running {
                        break;
                    }
                    guard.tick();
                    TrackerSnapshot::from(&*guard)
                };

                ticks = ticks.wrapping_add(1);
                if ticks % heartbeat_every == 0 {
                    let _ = events.send(TrackerEvent::Heartbeat { snapshot });
                }
            }
        });

        *ticker_guard = Some(handle);
    }

    async fn cancel_ticker(&self) {
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
        }
    }

    async fn emit_state_changed(&self) {
        let snapshot = self.get_snapshot().await;
        let _ = self.events.send(TrackerEvent::StateChanged { snapshot });
    }

    fn notify(&self, message: String) {
        warn!("{message}");
        let _ = self.events.send(TrackerEvent::Notice { message });
    }
}
