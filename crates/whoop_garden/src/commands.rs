//! Command-line surface of `whoop-garden`.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use whoop_client::fetch::{get_body_measurements, get_user_profile};
use whoop_client::models::{BodyMeasurements, UserProfile};
use whoop_client::{WhoopClient, get_day_data};

use crate::batch::{collect_days, trailing_days, week_of};
use crate::error::AppResult;
use crate::summary::{DailySummary, PersonaStats, WeekStats};

/// Pause between dates in `fetch-all`.
pub const FETCH_ALL_PACE: Duration = Duration::from_millis(500);

#[derive(Parser, Debug)]
#[command(name = "whoop-garden")]
#[command(about = "Aggregate WHOOP cycles, recovery, sleep and workouts by day", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Aggregate a single day with its recovery zone, strain level and primary sleep
    Daily {
        /// Date to fetch (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Summarize the ISO week containing a date
    Weekly {
        /// Any date within the week (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Rolling summary over the trailing days
    Persona {
        #[arg(long, default_value_t = 30)]
        days: u32,
    },

    /// Print every day with a cycle as one JSON line
    FetchAll {
        #[arg(long, default_value_t = 30)]
        days: u32,
    },

    /// Show the user profile and body measurements
    Profile,
}

#[derive(Debug, Serialize)]
struct ProfileOutput {
    profile: UserProfile,
    body: BodyMeasurements,
}

impl Cli {
    /// Run the parsed command, writing JSON to `out`.
    pub async fn execute(self, client: Arc<dyn WhoopClient>, out: &mut impl Write) -> AppResult<()> {
        let today = Utc::now().date_naive();
        match self.command {
            Commands::Daily { date } => {
                let date = date.unwrap_or(today);
                tracing::info!(%date, "fetching day");
                let day = get_day_data(client, date).await?;
                write_json(out, &DailySummary::build(day))?;
            }
            Commands::Weekly { date } => {
                let dates = week_of(date.unwrap_or(today));
                let days = collect_days(&client, &dates, today, Duration::ZERO).await;
                write_json(out, &WeekStats::build(&days))?;
            }
            Commands::Persona { days } => {
                let dates = trailing_days(today, days)?;
                let days = collect_days(&client, &dates, today, Duration::ZERO).await;
                write_json(out, &PersonaStats::build(&days)?)?;
            }
            Commands::FetchAll { days } => fetch_all(&client, today, days, out).await?,
            Commands::Profile => {
                let profile = get_user_profile(client.as_ref()).await?;
                let body = get_body_measurements(client.as_ref()).await?;
                write_json(out, &ProfileOutput { profile, body })?;
            }
        }
        Ok(())
    }
}

async fn fetch_all(
    client: &Arc<dyn WhoopClient>,
    today: NaiveDate,
    n: u32,
    out: &mut impl Write,
) -> AppResult<()> {
    let dates = trailing_days(today, n)?;
    let mut written = 0usize;
    for day in collect_days(client, &dates, today, FETCH_ALL_PACE).await {
        if !day.has_cycle() {
            tracing::info!(date = %day.date, "no cycle, skipping");
            continue;
        }
        serde_json::to_writer(&mut *out, &DailySummary::build(day))?;
        writeln!(out)?;
        written += 1;
    }
    tracing::info!(written, requested = n, "fetch-all finished");
    Ok(())
}

fn write_json<T: Serialize>(out: &mut impl Write, value: &T) -> AppResult<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
