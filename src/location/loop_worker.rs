use std::sync::Arc;

use tokio::sync::{mpsc, watch, Mutex};
use tokio_util::sync::CancellationToken;

use crate::{settings::TrackingSettings, tracking::TripState};

use super::LocationSample;

// Set to false to silence per-fix logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

/// Feed fixes from `receiver` into the shared trip until cancelled or the
/// provider closes the stream. `exhausted` flips to true in the latter case.
pub async fn location_loop(
    session_id: String,
    state: Arc<Mutex<TripState>>,
    settings: TrackingSettings,
    mut receiver: mpsc::Receiver<LocationSample>,
    cancel_token: CancellationToken,
    exhausted: watch::Sender<bool>,
) {
    let mut applied: u64 = 0;

    loop {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                log_info!("location loop for {} cancelled after {} fixes", session_id, applied);
                break;
            }
            next = receiver.recv() => {
                let Some(sample) = next else {
                    log_info!("location stream for {} ended after {} fixes", session_id, applied);
                    let _ = exhausted.send(true);
                    break;
                };

                let mut guard = state.lock().await;
                if let Some(previous) = guard.last_position() {
                    if sample.seconds_since(previous) < 0.0 {
                        log_warn!("fix at {} arrived after a later one", sample.timestamp);
                    }
                }
                if guard.apply_sample(&sample, &settings) {
                    applied += 1;
                    log_debug!(
                        "fix {} at {}: {:.1} km/h, {:.1} m total",
                        applied,
                        sample.timestamp,
                        guard.current_speed_kmh,
                        guard.distance_m
                    );
                }
            }
        }
    }
}
