use std::sync::Arc;

use anyhow::{bail, Context, Result};
use log::info;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{settings::TrackingSettings, tracking::TripState};

use super::{loop_worker::location_loop, LocationSource};

/// Owns the task that pipes one location subscription into the trip.
pub struct LocationController {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
    exhausted_rx: Option<watch::Receiver<bool>>,
}

impl LocationController {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
            exhausted_rx: None,
        }
    }

    pub fn start_updates(
        &mut self,
        session_id: String,
        source: &dyn LocationSource,
        state: Arc<Mutex<TripState>>,
        settings: TrackingSettings,
    ) -> Result<()> {
        if self.handle.is_some() {
            bail!("location updates already active");
        }

        let receiver = source
            .subscribe()
            .context("failed to subscribe to location updates")?;

        let cancel_token = CancellationToken::new();
        let (exhausted_tx, exhausted_rx) = watch::channel(false);

        let handle = tokio::spawn(location_loop(
            session_id,
            state,
            settings,
            receiver,
            cancel_token.clone(),
            exhausted_tx,
        ));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        self.exhausted_rx = Some(exhausted_rx);
        Ok(())
    }

    /// Receiver that turns true once the provider has no more fixes.
    pub fn exhausted_signal(&self) -> Option<watch::Receiver<bool>> {
        self.exhausted_rx.clone()
    }

    pub async fn stop_updates(&mut self) -> Result<()> {
        self.exhausted_rx = None;
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            info!("Stopping location updates");
            handle
                .await
                .context("location loop task failed to join")
                .map(|_| ())
        } else {
            Ok(())
        }
    }
}

impl Default for LocationController {
    fn default() -> Self {
        Self::new()
    }
}
