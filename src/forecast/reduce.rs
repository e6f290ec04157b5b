//! Bucket reduction
//!
//! Reduces the hourly records of one (day, daypart) bucket to a single
//! representative condition plus numeric aggregates, and keeps the per-hour
//! detail rows for drill-down views.

use chrono::SecondsFormat;
use serde::Serialize;

use crate::data::{HourlyRecord, RawForecast};

use super::conditions::{condition_info, refine_cloud_code};
use super::{
    CLOUD_COVER_PARAMETER, CONDITION_PARAMETER, KELVIN_OFFSET, PRECIPITATION_PARAMETER,
    TEMPERATURE_PARAMETER,
};

/// Per-bucket aggregates.
///
/// Instantaneous parameters carry their arithmetic mean; precipitation is
/// the accumulated sum over the period. A parameter with no present value
/// in the bucket serializes as `null`, the key is never omitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Averages {
    /// Mean significant-weather code
    #[serde(rename = "WW")]
    pub ww: Option<f64>,
    /// Mean temperature in degrees Celsius
    #[serde(rename = "TTT")]
    pub ttt: Option<f64>,
    /// Accumulated precipitation in mm
    #[serde(rename = "RR1c")]
    pub rr1c: Option<f64>,
    /// Mean effective cloud cover in percent
    #[serde(rename = "Neff")]
    pub neff: Option<f64>,
}

/// One retained per-hour detail row.
///
/// Values stay raw: the weather code, precipitation and cloud cover tokens
/// are passed through as the input reported them; only the temperature is
/// converted to Celsius for direct display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRow {
    /// Forecast instant, ISO-8601 with offset
    pub timestamp: String,
    /// Raw significant-weather token
    #[serde(rename = "WW")]
    pub ww: Option<String>,
    /// Temperature in degrees Celsius, one decimal
    #[serde(rename = "TTT")]
    pub ttt: Option<f64>,
    /// Raw precipitation token
    #[serde(rename = "RR1c")]
    pub rr1c: Option<String>,
    /// Raw cloud-cover token
    #[serde(rename = "Neff")]
    pub neff: Option<String>,
}

/// The reduced form of one daypart bucket, ready for the output contract.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodSummary {
    /// Daypart name
    pub period: String,
    /// Icon URL for the dominant condition
    pub icon: String,
    /// Display label for the dominant condition
    pub label: String,
    /// Aggregates over the bucket
    pub avg: Averages,
    /// Retained per-hour rows, in chronological order
    pub details: Vec<DetailRow>,
}

/// Reduces one bucket of hourly records.
///
/// Returns `None` when no record carries a condition code; such a bucket
/// is dropped rather than emitted with null aggregates.
///
/// The representative code is the numerically highest code present (higher
/// codes encode more severe phenomena, so the worst case wins). When that
/// code is a pure cloudiness code it is recomputed from the bucket's mean
/// cloud cover.
pub fn reduce_bucket(
    period: &str,
    records: &[&HourlyRecord],
    raw: &RawForecast,
) -> Option<PeriodSummary> {
    let max_code = records.iter().filter_map(|r| r.condition_code).max()?;

    let mean_cloud_cover = mean(records.iter().filter_map(|r| r.value(CLOUD_COVER_PARAMETER)));
    let dominant = refine_cloud_code(max_code, mean_cloud_cover);
    let info = condition_info(dominant);

    let avg = Averages {
        ww: mean(records.iter().filter_map(|r| r.value(CONDITION_PARAMETER))).map(round1),
        ttt: mean(records.iter().filter_map(|r| r.value(TEMPERATURE_PARAMETER)))
            .map(|kelvin| round1(kelvin - KELVIN_OFFSET)),
        rr1c: total(records.iter().filter_map(|r| r.value(PRECIPITATION_PARAMETER))).map(round1),
        neff: mean_cloud_cover.map(round1),
    };

    let details = records
        .iter()
        .map(|record| DetailRow {
            timestamp: record
                .timestamp
                .to_rfc3339_opts(SecondsFormat::Secs, false),
            ww: raw_token(raw, CONDITION_PARAMETER, record.index),
            ttt: record
                .value(TEMPERATURE_PARAMETER)
                .map(|kelvin| round1(kelvin - KELVIN_OFFSET)),
            rr1c: raw_token(raw, PRECIPITATION_PARAMETER, record.index),
            neff: raw_token(raw, CLOUD_COVER_PARAMETER, record.index),
        })
        .collect();

    Some(PeriodSummary {
        period: period.to_string(),
        icon: info.icon.to_string(),
        label: info.label.to_string(),
        avg,
        details,
    })
}

/// Arithmetic mean over present values; `None` when nothing is present.
fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in values {
        sum += value;
        count += 1;
    }
    (count > 0).then(|| sum / count as f64)
}

/// Sum over present values; `None` when nothing is present.
fn total(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in values {
        sum += value;
        count += 1;
    }
    (count > 0).then_some(sum)
}

/// Rounds to one decimal place.
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Looks up the raw input token of a parameter at a timestep index.
fn raw_token(raw: &RawForecast, parameter: &str, index: usize) -> Option<String> {
    raw.parameters
        .get(parameter)
        .and_then(|tokens| tokens.get(index))
        .cloned()
}
