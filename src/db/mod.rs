mod connection;
pub mod helpers;
mod migrations;
pub mod models;
mod repositories;
mod store;

pub use connection::Database;
pub use models::{DateRange, PeriodSummary, TripDraft, TripRecord};
pub use store::TripStore;
