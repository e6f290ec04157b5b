//! Forecast bucketing and reduction engine
//!
//! Single-pass pipeline over one forecast run: normalize the raw arrays
//! into typed hourly records, classify each hour into a calendar-day/
//! daypart bucket, reduce every bucket to a dominant condition plus
//! aggregates, and assemble the day-ordered summary structure.
//!
//! All steps are pure transformations anchored by an injected "now"
//! instant; identical input and anchor produce byte-identical output.

pub mod conditions;
pub mod dayparts;
pub mod reduce;
pub mod summary;
pub mod timeline;

pub use summary::{build_summary, WeatherSummary};

use thiserror::Error;

/// Name of the significant-weather code parameter in MOSMIX runs
pub const CONDITION_PARAMETER: &str = "ww";
/// Name of the 2m temperature parameter (Kelvin)
pub const TEMPERATURE_PARAMETER: &str = "TTT";
/// Name of the accumulated hourly precipitation parameter (mm)
pub const PRECIPITATION_PARAMETER: &str = "RR1c";
/// Name of the effective cloud cover parameter (percent)
pub const CLOUD_COVER_PARAMETER: &str = "Neff";
/// Offset between the Kelvin input scale and the Celsius output scale
pub const KELVIN_OFFSET: f64 = 273.15;

/// Errors that can occur while building a summary
///
/// Data-quality problems (missing values, short parameter arrays, unknown
/// codes) never surface here; they degrade inside the pipeline. Only a
/// broken producer contract fails the run.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// A forecast timestamp was not valid ISO-8601
    #[error("invalid forecast timestamp '{value}': {source}")]
    InvalidTimestamp {
        value: String,
        source: chrono::ParseError,
    },
}
