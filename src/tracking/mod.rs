pub mod controller;
pub mod state;

pub use controller::{TrackerController, TrackerEvent, TrackerSnapshot};
pub use state::{StartKind, TrackingStatus, TripState};
