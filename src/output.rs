//! Text and JSON rendering for command results.

use serde::Serialize;
use serde_json::json;

use rideistics_lib::{
    db::{DateRange, TripRecord},
    stats::{Dashboard, Projection},
};

pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    pub fn error(&self, err: &anyhow::Error) {
        if self.json {
            let chain: Vec<String> = err.chain().map(ToString::to_string).collect();
            println!("{}", json!({ "error": err.to_string(), "causes": chain }));
        } else {
            eprintln!("error: {err:#}");
        }
    }

    pub fn message(&self, text: &str, count: usize) -> anyhow::Result<()> {
        if self.json {
            println!("{}", json!({ "message": text, "count": count }));
        } else {
            println!("{text}");
        }
        Ok(())
    }

    pub fn trip(&self, trip: &TripRecord) -> anyhow::Result<()> {
        if self.json {
            return self.print_json(trip);
        }
        println!("Trip #{}  {} {}-{}", trip.id, trip.date, trip.start_time, trip.end_time);
        println!("  duration     {:>10.1} min", trip.duration_minutes());
        println!("  distance     {:>10.2} km", trip.distance_km);
        println!("  avg speed    {:>10.1} km/h", trip.avg_speed_kmh);
        println!("  max speed    {:>10.1} km/h", trip.max_speed_kmh);
        println!("  fuel         {:>10.3} L", trip.fuel_liters);
        println!("  set mileage  {:>10.1} km/L", trip.set_mileage_kml);
        println!("  real mileage {:>10.1} km/L", trip.real_mileage_kml);
        Ok(())
    }

    pub fn trips(&self, trips: &[TripRecord]) -> anyhow::Result<()> {
        if self.json {
            return self.print_json(&trips);
        }
        if trips.is_empty() {
            println!("No trips recorded.");
            return Ok(());
        }
        println!(
            "{:>5}  {:<10}  {:<8}  {:>8}  {:>8}  {:>7}  {:>7}",
            "id", "date", "start", "km", "min", "L", "km/L"
        );
        for trip in trips {
            println!(
                "{:>5}  {:<10}  {:<8}  {:>8.2}  {:>8.1}  {:>7.3}  {:>7.1}",
                trip.id,
                trip.date,
                trip.start_time,
                trip.distance_km,
                trip.duration_minutes(),
                trip.fuel_liters,
                trip.real_mileage_kml
            );
        }
        Ok(())
    }

    pub fn dashboard(&self, dashboard: &Dashboard) -> anyhow::Result<()> {
        if self.json {
            return self.print_json(dashboard);
        }

        let range = match dashboard.range {
            DateRange::All => "all dates".to_string(),
            DateRange::Between { start, end } if start == end => start.to_string(),
            DateRange::Between { start, end } => format!("{start} .. {end}"),
        };
        let summary = &dashboard.summary;
        println!("{} ({range})", dashboard.period.label());
        println!("  trips         {}", summary.trip_count);
        println!("  distance      {:.2} km", summary.total_distance_km);
        println!("  fuel          {:.3} L", summary.total_fuel_liters);
        match summary.avg_real_mileage_kml {
            Some(avg) => println!("  real mileage  {avg:.1} km/L"),
            None => println!("  real mileage  N/A"),
        }

        println!("Mileage by average speed:");
        match &dashboard.speed_efficiency {
            Some(chart) => {
                for bucket in chart.buckets.iter().filter(|b| b.trips > 0) {
                    println!(
                        "  {:>6} km/h  {:>5.1} km/L  ({} trips)",
                        bucket.label, bucket.avg_real_mileage_kml, bucket.trips
                    );
                }
            }
            None => println!("  no chart data"),
        }

        println!("Distance vs duration:");
        if dashboard.distance_vs_duration.is_empty() {
            println!("  no chart data");
        }
        for point in &dashboard.distance_vs_duration {
            println!("  {:>8.2} km  {:>7.1} min", point.distance_km, point.duration_minutes);
        }

        println!("Trips by time of day:");
        if dashboard.time_of_day.is_empty() {
            println!("  no chart data");
        }
        for band in &dashboard.time_of_day {
            println!("  {:<8} {}", band.band.label(), band.trips);
        }
        Ok(())
    }

    pub fn projection(&self, projection: Option<&Projection>, horizon: u32) -> anyhow::Result<()> {
        if self.json {
            return self.print_json(&json!({
                "horizonDays": horizon,
                "projection": projection,
            }));
        }
        let Some(p) = projection else {
            println!("Not enough trips to project; record at least two.");
            return Ok(());
        };
        println!(
            "Next {} days (from {} days of history):",
            p.horizon_days, p.history_span_days
        );
        println!("  rides       {:.1}", p.rides);
        println!("  distance    {:.1} km", p.distance_km);
        println!("  fuel        {:.2} L", p.fuel_liters);
        println!("  efficiency  {:.1} km/L", p.efficiency_kml);
        Ok(())
    }

    fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}
