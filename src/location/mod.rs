mod controller;
mod loop_worker;
mod sample;
mod source;

pub use controller::LocationController;
pub use sample::{haversine_m, LocationSample};
pub use source::{LocationSource, Pacing, ReplaySource};
