//! Command line definitions.

use std::path::PathBuf;

use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use rideistics_lib::stats::Period;

#[derive(Parser, Debug)]
#[command(name = "rideistics", version, about = "Ride tracking and fuel statistics")]
pub struct Cli {
    /// SQLite database file (defaults to $RIDEISTICS_HOME/rideistics.sqlite3)
    #[arg(long, value_name = "FILE", global = true)]
    pub db: Option<PathBuf>,

    /// Settings JSON file (defaults to $RIDEISTICS_HOME/settings.json)
    #[arg(long, value_name = "FILE", global = true)]
    pub settings: Option<PathBuf>,

    /// Print results as JSON instead of text
    #[arg(long, action = ArgAction::SetTrue, global = true)]
    pub json: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, action = ArgAction::SetTrue, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a recorded track as a live trip and save it
    Record {
        /// Baseline mileage in km/L
        #[arg(long, value_name = "KML")]
        mileage: String,
        /// CSV track: latitude,longitude,speed_mps,speed_accuracy_mps,accuracy_m,timestamp
        #[arg(long, value_name = "FILE")]
        track: PathBuf,
        /// Fixed delay between fixes in milliseconds; defaults to the recorded spacing
        #[arg(long, value_name = "MS")]
        pace_ms: Option<u64>,
    },
    /// Totals and chart series for a period
    Dashboard(PeriodArgs),
    /// Project rides, distance and fuel over the configured horizon
    Project,
    /// List trips in a period
    List(PeriodArgs),
    /// Show one trip
    Show {
        id: i64,
    },
    /// Insert random demo trips
    Seed {
        #[arg(long, default_value_t = 25)]
        count: usize,
    },
    /// Delete every stored trip
    Clear,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum PeriodKind {
    Today,
    Week,
    Month,
    SixMonths,
    Year,
    All,
    Custom,
}

#[derive(Args, Debug)]
pub struct PeriodArgs {
    #[arg(long, value_enum, default_value_t = PeriodKind::All)]
    pub period: PeriodKind,
    /// First day of a custom period (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub from: Option<NaiveDate>,
    /// Last day of a custom period (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub to: Option<NaiveDate>,
}

impl PeriodArgs {
    pub fn period(&self) -> Result<Period> {
        let period = match self.period {
            PeriodKind::Today => Period::Today,
            PeriodKind::Week => Period::ThisWeek,
            PeriodKind::Month => Period::ThisMonth,
            PeriodKind::SixMonths => Period::LastSixMonths,
            PeriodKind::Year => Period::ThisYear,
            PeriodKind::All => Period::AllTime,
            PeriodKind::Custom => match (self.from, self.to) {
                (Some(start), Some(end)) => Period::Custom { start, end },
                _ => bail!("--period custom needs both --from and --to"),
            },
        };
        Ok(period)
    }
}
