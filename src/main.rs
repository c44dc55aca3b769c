mod cli;
mod output;

use std::{process::ExitCode, sync::Arc, time::Duration};

use anyhow::{bail, Result};
use clap::Parser;
use log::{debug, info};
use rideistics_lib::{
    db::TripStore,
    init_logging,
    location::ReplaySource,
    seed::demo_trips,
    stats::{project, Dashboard},
    tracking::TrackerEvent,
    AppState,
};

use cli::{Cli, Commands};
use output::Output;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let out = Output::new(cli.json);
    match run(cli, &out).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            out.error(&err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, out: &Output) -> Result<()> {
    let state = AppState::open(cli.db, cli.settings)?;
    let today = state.clock.now().date();

    match cli.cmd {
        Commands::Record {
            mileage,
            track,
            pace_ms,
        } => {
            let source = ReplaySource::from_csv(&track)?;
            let source = match pace_ms {
                Some(ms) => source.with_pace(Duration::from_millis(ms)),
                None => source.with_recorded_pacing(),
            };
            let tracker = state.tracker(Arc::new(source));

            let mut events = tracker.subscribe();
            let json = out.is_json();
            let printer = tokio::spawn(async move {
                while let Ok(event) = events.recv().await {
                    match &event {
                        TrackerEvent::Notice { message } if !json => eprintln!("! {message}"),
                        TrackerEvent::Heartbeat { snapshot } => debug!(
                            "{} s, {:.2} km, {:.1} km/h",
                            snapshot.state.elapsed_secs,
                            snapshot.distance_km,
                            snapshot.state.current_speed_kmh
                        ),
                        _ => {}
                    }
                }
            });

            tracker.set_baseline_mileage(&mileage).await?;
            tracker.start().await?;
            tracker.wait_for_source_end().await;
            let recorded = tracker.record_and_reset().await;
            printer.abort();

            match recorded? {
                Some(trip) => out.trip(&trip),
                None => bail!("trip was tracked but could not be saved"),
            }
        }
        Commands::Dashboard(args) => {
            let dashboard = Dashboard::load(&state.db, args.period()?, today).await?;
            out.dashboard(&dashboard)
        }
        Commands::Project => {
            let history = state.db.list_all_by_date().await?;
            let horizon = state.settings.projection().horizon_days;
            out.projection(project(&history, horizon).as_ref(), horizon)
        }
        Commands::List(args) => {
            let range = args.period()?.resolve(today)?;
            let trips = state.db.list_in_range(range).await?;
            out.trips(&trips)
        }
        Commands::Show { id } => match state.db.get(id).await? {
            Some(trip) => out.trip(&trip),
            None => bail!("no trip with id {id}"),
        },
        Commands::Seed { count } => {
            let trips = demo_trips(&mut rand::thread_rng(), count, today);
            for trip in &trips {
                state.db.insert(trip).await?;
            }
            info!("Seeded {} demo trips", trips.len());
            out.message(&format!("inserted {} demo trips", trips.len()), trips.len())
        }
        Commands::Clear => {
            let deleted = state.db.delete_all().await?;
            out.message(&format!("deleted {deleted} trips"), deleted)
        }
    }
}
