use std::{
    path::Path,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use anyhow::{Context, Result};
use log::{debug, info};
use tokio::sync::mpsc;

use super::LocationSample;

// One slot: a free slot means the previous fix has been taken by the subscriber.
const CHANNEL_CAPACITY: usize = 1;

/// Push-style provider of location fixes. Each call to `subscribe` starts a
/// new stream; dropping the receiver cancels it.
pub trait LocationSource: Send + Sync {
    fn subscribe(&self) -> Result<mpsc::Receiver<LocationSample>>;
}

/// How a replay spaces out its fixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// Hand out fixes as fast as they are consumed.
    Immediate,
    /// Constant delay before every fix.
    Fixed(Duration),
    /// Wait out the gap between recorded timestamps, so wall-clock duration
    /// matches the recorded ride.
    Recorded,
}

impl Pacing {
    fn delay(self, previous: Option<&LocationSample>, next: &LocationSample) -> Option<Duration> {
        match self {
            Pacing::Immediate => None,
            Pacing::Fixed(pace) => Some(pace),
            Pacing::Recorded => {
                let previous = previous?;
                (next.timestamp - previous.timestamp).to_std().ok()
            }
        }
    }
}

/// Replays a recorded track. Resubscribing continues after the last fix the
/// subscriber actually received, so pause/resume behaves like a live provider.
#[derive(Clone)]
pub struct ReplaySource {
    samples: Arc<Vec<LocationSample>>,
    cursor: Arc<AtomicUsize>,
    pacing: Pacing,
}

impl ReplaySource {
    pub fn new(samples: Vec<LocationSample>) -> Self {
        Self {
            samples: Arc::new(samples),
            cursor: Arc::new(AtomicUsize::new(0)),
            pacing: Pacing::Immediate,
        }
    }

    /// Delay between consecutive fixes.
    pub fn with_pace(mut self, pace: Duration) -> Self {
        self.pacing = Pacing::Fixed(pace);
        self
    }

    /// Space fixes by their recorded timestamps.
    pub fn with_recorded_pacing(mut self) -> Self {
        self.pacing = Pacing::Recorded;
        self
    }

    pub fn pacing(&self) -> Pacing {
        self.pacing
    }

    /// Load a CSV with the header
    /// `latitude,longitude,speed_mps,speed_accuracy_mps,accuracy_m,timestamp`.
    pub fn from_csv(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .with_context(|| format!("failed to open track {}", path.display()))?;

        let mut samples = Vec::new();
        for (line, row) in reader.deserialize::<LocationSample>().enumerate() {
            let sample = row.with_context(|| {
                format!("invalid fix on data line {} of {}", line + 1, path.display())
            })?;
            samples.push(sample);
        }

        info!("Loaded {} fixes from {}", samples.len(), path.display());
        Ok(Self::new(samples))
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.samples
            .len()
            .saturating_sub(self.cursor.load(Ordering::SeqCst))
    }
}

impl LocationSource for ReplaySource {
    fn subscribe(&self) -> Result<mpsc::Receiver<LocationSample>> {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let samples = self.samples.clone();
        let cursor = self.cursor.clone();
        let pacing = self.pacing;

        tokio::spawn(async move {
            let mut index = cursor.load(Ordering::SeqCst);
            loop {
                // Fails once the subscriber is gone; an unreceived fix stays
                // behind the cursor and is replayed on the next subscription.
                let Ok(permit) = tx.reserve().await else {
                    break;
                };
                cursor.store(index, Ordering::SeqCst);

                let Some(sample) = samples.get(index).copied() else {
                    debug!("replay exhausted after {index} fixes");
                    break;
                };
                let previous = index.checked_sub(1).and_then(|i| samples.get(i));
                if let Some(delay) = pacing.delay(previous, &sample) {
                    tokio::time::sleep(delay).await;
                }
                permit.send(sample);
                index += 1;
            }
        });

        Ok(rx)
    }
}
