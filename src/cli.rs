//! Command-line interface parsing for wetterwidget
//!
//! This module handles parsing of CLI arguments using clap: station
//! selection, an optional local input file, and output options.

use std::path::PathBuf;

use clap::Parser;

/// Wetterwidget - compact JSON weather summaries from DWD MOSMIX forecasts
#[derive(Parser, Debug)]
#[command(name = "wetterwidget")]
#[command(about = "Build a compact JSON weather summary from a DWD MOSMIX point forecast")]
#[command(version)]
pub struct Cli {
    /// DWD station identifier to fetch
    ///
    /// Examples:
    ///   wetterwidget --station P755     # Aschheim
    ///   wetterwidget --station 10865    # München Stadt
    #[arg(long, default_value = "P755", value_name = "ID")]
    pub station: String,

    /// Read a local .kmz or .kml file instead of fetching from DWD Open Data
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Write the summary to a file instead of stdout
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}
