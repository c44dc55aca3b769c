use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;

use crate::db::{DateRange, PeriodSummary, TripStore};

use super::{
    aggregate::{
        distance_vs_duration, speed_efficiency, time_of_day_counts, DistanceDurationPoint,
        SpeedEfficiencyChart, TimeOfDayCount,
    },
    Period,
};

/// Everything the statistics view shows for one period.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub period: Period,
    pub range: DateRange,
    pub summary: PeriodSummary,
    pub speed_efficiency: Option<SpeedEfficiencyChart>,
    pub distance_vs_duration: Vec<DistanceDurationPoint>,
    pub time_of_day: Vec<TimeOfDayCount>,
}

impl Dashboard {
    pub async fn load(store: &dyn TripStore, period: Period, today: NaiveDate) -> Result<Self> {
        let range = period.resolve(today)?;
        let summary = store.summarize(range).await?;
        let records = store.list_in_range(range).await?;

        Ok(Self {
            period,
            range,
            summary,
            speed_efficiency: speed_efficiency(&records),
            distance_vs_duration: distance_vs_duration(&records),
            time_of_day: time_of_day_counts(&records),
        })
    }
}
