use anyhow::Result;
use async_trait::async_trait;

use super::{
    models::{DateRange, PeriodSummary, TripDraft, TripRecord},
    Database,
};

/// Persistence boundary for finished trips.
#[async_trait]
pub trait TripStore: Send + Sync {
    /// Persist a finished trip and return its new id.
    async fn insert(&self, trip: &TripDraft) -> Result<i64>;
    async fn get(&self, trip_id: i64) -> Result<Option<TripRecord>>;
    async fn summarize(&self, range: DateRange) -> Result<PeriodSummary>;
    async fn list_in_range(&self, range: DateRange) -> Result<Vec<TripRecord>>;
    /// Full history, oldest date first.
    async fn list_all_by_date(&self) -> Result<Vec<TripRecord>>;
    async fn delete_all(&self) -> Result<usize>;
}

#[async_trait]
impl TripStore for Database {
    async fn insert(&self, trip: &TripDraft) -> Result<i64> {
        self.insert_trip(trip).await
    }

    async fn get(&self, trip_id: i64) -> Result<Option<TripRecord>> {
        self.get_trip(trip_id).await
    }

    async fn summarize(&self, range: DateRange) -> Result<PeriodSummary> {
        self.summarize_trips(range).await
    }

    async fn list_in_range(&self, range: DateRange) -> Result<Vec<TripRecord>> {
        self.list_trips_in_range(range).await
    }

    async fn list_all_by_date(&self) -> Result<Vec<TripRecord>> {
        self.list_trips_by_date().await
    }

    async fn delete_all(&self) -> Result<usize> {
        self.delete_all_trips().await
    }
}
