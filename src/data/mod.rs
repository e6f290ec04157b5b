//! Core data models for the MOSMIX summary pipeline
//!
//! This module contains the data types exchanged between the KML producer,
//! the forecast reduction engine, and the JSON output.

pub mod mosmix;

pub use mosmix::{MosmixClient, MosmixError};

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};

/// Token used by MOSMIX forecasts for a value that was not reported.
///
/// Distinct from zero: a `"-"` entry means the model produced no value for
/// that hour at all.
pub const MISSING_SENTINEL: &str = "-";

/// One decoded MOSMIX forecast run, exactly as the KML document carries it.
///
/// Timestamps and parameter values are kept as raw strings here; typing
/// happens in the forecast pipeline so that the unmodified series can be
/// passed through to the output for detail views.
#[derive(Debug, Clone, Default)]
pub struct RawForecast {
    /// Station identifier from the placemark name (e.g. "P755")
    pub station_name: String,
    /// Human-readable station description (e.g. "ASCHHEIM")
    pub station_description: String,
    /// Ordered ISO-8601 forecast timestamps, one per timestep
    pub time_steps: Vec<String>,
    /// Parameter name (e.g. "TTT", "ww") to raw value tokens,
    /// index-aligned with `time_steps`
    pub parameters: HashMap<String, Vec<String>>,
}

/// One typed forecast timestep produced by the timeline normalizer.
///
/// Immutable once constructed. `index` points back at the position in the
/// raw input arrays so that detail views can recover the original tokens.
#[derive(Debug, Clone)]
pub struct HourlyRecord {
    /// Position in the raw `time_steps`/parameter arrays
    pub index: usize,
    /// Forecast instant, carrying the offset the input declared
    pub timestamp: DateTime<FixedOffset>,
    /// Significant-weather code (`ww`), truncated to an integer;
    /// `None` when the hour had no reported code
    pub condition_code: Option<u16>,
    /// Parameter name to numeric value; `None` marks a missing or
    /// unparsable token
    pub values: HashMap<String, Option<f64>>,
}

impl HourlyRecord {
    /// Returns the numeric value of `parameter` for this hour, if present.
    pub fn value(&self, parameter: &str) -> Option<f64> {
        self.values.get(parameter).copied().flatten()
    }
}
