use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension, Row};

use crate::db::{
    connection::Database,
    helpers::{parse_date, to_i64, to_u64},
    models::{format_date, DateRange, PeriodSummary, TripDraft, TripRecord},
};

const TRIP_COLUMNS: &str = "id, trip_date, start_time, end_time, duration_secs, distance_km,
     avg_speed_kmh, max_speed_kmh, fuel_liters, set_mileage_kml, real_mileage_kml";

// An open range binds NULL for both bounds and matches every row.
const RANGE_FILTER: &str = "(?1 IS NULL OR trip_date BETWEEN ?1 AND ?2)";

fn row_to_trip(row: &Row) -> Result<TripRecord> {
    let trip_date: String = row.get("trip_date")?;
    let duration_secs: i64 = row.get("duration_secs")?;

    Ok(TripRecord {
        id: row.get("id")?,
        date: parse_date(&trip_date, "trip_date")?,
        start_time: row.get("start_time")?,
        end_time: row.get("end_time")?,
        duration_secs: to_u64(duration_secs, "duration_secs")?,
        distance_km: row.get("distance_km")?,
        avg_speed_kmh: row.get("avg_speed_kmh")?,
        max_speed_kmh: row.get("max_speed_kmh")?,
        fuel_liters: row.get("fuel_liters")?,
        set_mileage_kml: row.get("set_mileage_kml")?,
        real_mileage_kml: row.get("real_mileage_kml")?,
    })
}

fn range_params(range: DateRange) -> (Option<String>, Option<String>) {
    match range.bounds() {
        Some((start, end)) => (Some(format_date(start)), Some(format_date(end))),
        None => (None, None),
    }
}

impl Database {
    pub async fn insert_trip(&self, trip: &TripDraft) -> Result<i64> {
        let record = trip.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO trips (trip_date, start_time, end_time, duration_secs, distance_km,
                                    avg_speed_kmh, max_speed_kmh, fuel_liters, set_mileage_kml, real_mileage_kml)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    format_date(record.date),
                    record.start_time,
                    record.end_time,
                    to_i64(record.duration_secs)?,
                    record.distance_km,
                    record.avg_speed_kmh,
                    record.max_speed_kmh,
                    record.fuel_liters,
                    record.set_mileage_kml,
                    record.real_mileage_kml,
                ],
            )
            .with_context(|| "failed to insert trip")?;
            Ok(conn.last_insert_rowid())
        })
        .await
    }

    pub async fn get_trip(&self, trip_id: i64) -> Result<Option<TripRecord>> {
        self.execute(move |conn| {
            let sql = format!("SELECT {TRIP_COLUMNS} FROM trips WHERE id = ?1");
            let trip = conn
                .query_row(&sql, params![trip_id], |row| Ok(row_to_trip(row)))
                .optional()?
                .transpose()?;
            Ok(trip)
        })
        .await
    }

    pub async fn summarize_trips(&self, range: DateRange) -> Result<PeriodSummary> {
        let (start, end) = range_params(range);
        self.execute(move |conn| {
            let sql = format!(
                "SELECT COUNT(id), SUM(fuel_liters), SUM(distance_km), AVG(real_mileage_kml)
                 FROM trips
                 WHERE {RANGE_FILTER}"
            );
            let summary = conn.query_row(&sql, params![start, end], |row| {
                let count: i64 = row.get(0)?;
                Ok((
                    count,
                    row.get::<_, Option<f64>>(1)?,
                    row.get::<_, Option<f64>>(2)?,
                    row.get::<_, Option<f64>>(3)?,
                ))
            })?;

            let (count, fuel, distance, avg_real) = summary;
            Ok(PeriodSummary::from_aggregates(
                to_u64(count, "trip count")?,
                fuel,
                distance,
                avg_real,
            ))
        })
        .await
    }

    pub async fn list_trips_in_range(&self, range: DateRange) -> Result<Vec<TripRecord>> {
        let (start, end) = range_params(range);
        self.execute(move |conn| {
            let sql = format!(
                "SELECT {TRIP_COLUMNS} FROM trips
                 WHERE {RANGE_FILTER}
                 ORDER BY trip_date ASC, start_time ASC, id ASC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let mut rows = stmt.query(params![start, end])?;
            let mut trips = Vec::new();
            while let Some(row) = rows.next()? {
                trips.push(row_to_trip(row)?);
            }
            Ok(trips)
        })
        .await
    }

    /// Every trip, oldest date first.
    pub async fn list_trips_by_date(&self) -> Result<Vec<TripRecord>> {
        self.list_trips_in_range(DateRange::All).await
    }

    /// Remove every trip, returning how many rows were deleted.
    pub async fn delete_all_trips(&self) -> Result<usize> {
        self.execute(|conn| {
            let deleted = conn
                .execute("DELETE FROM trips", [])
                .with_context(|| "failed to clear trips")?;
            Ok(deleted)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn draft(date: (i32, u32, u32), start: &str, km: f64, fuel: f64, real: f64) -> TripDraft {
        TripDraft {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            start_time: start.into(),
            end_time: "23:59:59".into(),
            duration_secs: 600,
            distance_km: km,
            avg_speed_kmh: km * 6.0,
            max_speed_kmh: km * 8.0,
            fuel_liters: fuel,
            set_mileage_kml: 40.0,
            real_mileage_kml: real,
        }
    }

    #[tokio::test]
    async fn insert_then_get_round_trips() {
        let db = Database::in_memory().unwrap();
        let trip = draft((2025, 1, 5), "07:12:30", 12.345678, 0.31234, 39.5);
        let id = db.insert_trip(&trip).await.unwrap();

        let loaded = db.get_trip(id).await.unwrap().unwrap();
        assert_eq!(loaded, trip.with_id(id));
        assert!(db.get_trip(id + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn summary_respects_range() {
        let db = Database::in_memory().unwrap();
        db.insert_trip(&draft((2025, 1, 1), "08:00:00", 10.0, 0.5, 20.0))
            .await
            .unwrap();
        db.insert_trip(&draft((2025, 1, 15), "08:00:00", 30.0, 1.0, 30.0))
            .await
            .unwrap();
        db.insert_trip(&draft((2025, 2, 1), "08:00:00", 5.0, 0.25, 0.0))
            .await
            .unwrap();

        let jan = DateRange::between(
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        )
        .unwrap();
        let summary = db.summarize_trips(jan).await.unwrap();
        assert_eq!(summary.trip_count, 2);
        assert!((summary.total_distance_km - 40.0).abs() < 1e-9);
        assert!((summary.total_fuel_liters - 1.5).abs() < 1e-9);
        assert_eq!(summary.avg_real_mileage_kml, Some(25.0));

        let all = db.summarize_trips(DateRange::All).await.unwrap();
        assert_eq!(all.trip_count, 3);
        // Zero readings still count towards the mean, as the stored average does.
        assert!((all.avg_real_mileage_kml.unwrap() - 50.0 / 3.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn empty_range_summary_is_zeroed() {
        let db = Database::in_memory().unwrap();
        let summary = db
            .summarize_trips(DateRange::single_day(
                NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            ))
            .await
            .unwrap();
        assert_eq!(summary, PeriodSummary::default());
    }

    #[tokio::test]
    async fn listings_are_ordered_and_clear_removes_everything() {
        let db = Database::in_memory().unwrap();
        db.insert_trip(&draft((2025, 3, 2), "18:00:00", 1.0, 0.1, 10.0))
            .await
            .unwrap();
        db.insert_trip(&draft((2025, 3, 1), "09:00:00", 2.0, 0.1, 20.0))
            .await
            .unwrap();
        db.insert_trip(&draft((2025, 3, 2), "07:00:00", 3.0, 0.1, 30.0))
            .await
            .unwrap();

        let by_date = db.list_trips_by_date().await.unwrap();
        let order: Vec<f64> = by_date.iter().map(|t| t.distance_km).collect();
        assert_eq!(order, vec![2.0, 3.0, 1.0]);

        assert_eq!(db.delete_all_trips().await.unwrap(), 3);
        assert!(db.list_trips_by_date().await.unwrap().is_empty());
    }
}
