//! Wetterwidget - compact JSON weather summaries from DWD MOSMIX forecasts
//!
//! Fetches the latest MOSMIX-L run for one station (or reads it from a
//! local file), reduces the hourly forecast into calendar-day/daypart
//! buckets, and writes the UI-ready summary as JSON.

mod cli;
mod data;
mod forecast;

use std::fs;

use chrono::{DurationRound, TimeDelta, Utc};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use data::{mosmix, MosmixClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr; stdout is reserved for the JSON summary.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let raw = match &cli.input {
        Some(path) => mosmix::load_file(path)?,
        None => MosmixClient::new().fetch_forecast(&cli.station).await?,
    };
    info!(
        station = %raw.station_name,
        time_steps = raw.time_steps.len(),
        parameters = raw.parameters.len(),
        "forecast run decoded"
    );

    // Truncate to the hour so the hour containing "now" still counts as
    // upcoming.
    let now = Utc::now().duration_trunc(TimeDelta::hours(1))?;
    let summary = forecast::build_summary(&raw, now)?;

    let json = if cli.pretty {
        serde_json::to_string_pretty(&summary)?
    } else {
        serde_json::to_string(&summary)?
    };

    match &cli.output {
        Some(path) => {
            fs::write(path, json)?;
            info!(path = %path.display(), "summary written");
        }
        None => println!("{json}"),
    }

    Ok(())
}
