//! Summary assembly
//!
//! Groups the reduced buckets by calendar day, orders days chronologically
//! and dayparts canonically, attaches display labels, and emits the final
//! output structure together with the unfiltered raw series.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, NaiveDate, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::warn;

use crate::data::{HourlyRecord, RawForecast};

use super::dayparts::{classify, DAYPART_ORDER};
use super::reduce::{reduce_bucket, PeriodSummary};
use super::timeline::normalize;
use super::{
    SummaryError, CLOUD_COVER_PARAMETER, CONDITION_PARAMETER, PRECIPITATION_PARAMETER,
    TEMPERATURE_PARAMETER,
};

/// German weekday abbreviations, Monday first
const WEEKDAYS: [&str; 7] = ["Mo", "Di", "Mi", "Do", "Fr", "Sa", "So"];

/// Raw token series of the summary parameters, passed through unfiltered
/// for consumers that need the un-bucketed detail.
#[derive(Debug, Clone, Serialize)]
pub struct ParameterSeries {
    /// Significant-weather tokens
    #[serde(rename = "WW")]
    pub ww: Vec<String>,
    /// Temperature tokens (Kelvin)
    #[serde(rename = "TTT")]
    pub ttt: Vec<String>,
    /// Precipitation tokens
    #[serde(rename = "RR1c")]
    pub rr1c: Vec<String>,
    /// Cloud-cover tokens
    #[serde(rename = "Neff")]
    pub neff: Vec<String>,
}

/// The complete UI-ready summary of one forecast run.
///
/// `days` keys are display labels in chronological order; each value holds
/// the day's non-empty daypart buckets in canonical order.
#[derive(Debug, Clone, Serialize)]
pub struct WeatherSummary {
    /// Station identifier
    pub name: String,
    /// Station description
    pub description: String,
    /// Display label to reduced dayparts, chronologically keyed
    pub days: IndexMap<String, Vec<PeriodSummary>>,
    /// Every forecast timestamp of the run, past hours included
    #[serde(rename = "timeSteps")]
    pub time_steps: Vec<String>,
    /// Raw parameter token series, index-aligned with `timeSteps`
    pub parameters: ParameterSeries,
}

/// Runs the full pipeline over one decoded forecast run.
///
/// `now` is the anchor separating past from future hours; callers should
/// truncate it to the hour so that the hour containing "now" still counts
/// as upcoming. Hours before the anchor stay out of every bucket but
/// remain in `timeSteps` and `parameters`.
pub fn build_summary(
    raw: &RawForecast,
    now: DateTime<Utc>,
) -> Result<WeatherSummary, SummaryError> {
    let records = normalize(raw)?;

    if !records.iter().any(|r| r.condition_code.is_some()) {
        warn!("run carries no usable condition codes, day summaries will be empty");
    }

    // Bucket the upcoming hours by calendar day, then daypart.
    let mut days: BTreeMap<NaiveDate, HashMap<&'static str, Vec<&HourlyRecord>>> = BTreeMap::new();
    for record in &records {
        let assignment = classify(record.timestamp, now);
        if !assignment.included {
            continue;
        }
        days.entry(assignment.day)
            .or_default()
            .entry(assignment.daypart.name)
            .or_default()
            .push(record);
    }

    let today = now.date_naive();
    let mut day_summaries: IndexMap<String, Vec<PeriodSummary>> = IndexMap::new();
    for (day, buckets) in &days {
        let mut periods = Vec::new();
        for daypart in DAYPART_ORDER {
            if let Some(members) = buckets.get(daypart) {
                if let Some(period) = reduce_bucket(daypart, members, raw) {
                    periods.push(period);
                }
            }
        }
        day_summaries.insert(day_label(*day, today), periods);
    }

    // Re-serialize the timestamps in input order, past hours included.
    let mut steps: Vec<(usize, String)> = records
        .iter()
        .map(|record| {
            (
                record.index,
                record
                    .timestamp
                    .to_rfc3339_opts(SecondsFormat::Secs, false),
            )
        })
        .collect();
    steps.sort_by_key(|(index, _)| *index);

    Ok(WeatherSummary {
        name: raw.station_name.clone(),
        description: raw.station_description.clone(),
        days: day_summaries,
        time_steps: steps.into_iter().map(|(_, step)| step).collect(),
        parameters: ParameterSeries {
            ww: series(raw, CONDITION_PARAMETER),
            ttt: series(raw, TEMPERATURE_PARAMETER),
            rr1c: series(raw, PRECIPITATION_PARAMETER),
            neff: series(raw, CLOUD_COVER_PARAMETER),
        },
    })
}

/// Display label for a calendar day relative to the anchor date.
///
/// Offsets 0-2 get the relative German labels; everything else, including
/// the previous day that a post-midnight bucket can produce, gets the
/// weekday abbreviation plus day and month.
pub fn day_label(day: NaiveDate, today: NaiveDate) -> String {
    match (day - today).num_days() {
        0 => "Heute".to_string(),
        1 => "Morgen".to_string(),
        2 => "Übermorgen".to_string(),
        _ => {
            let weekday = WEEKDAYS[day.weekday().num_days_from_monday() as usize];
            format!("{weekday}, {:02}.{:02}.", day.day(), day.month())
        }
    }
}

/// Raw token series of one parameter; an absent parameter yields an empty
/// series, mirroring the upstream data.
fn series(raw: &RawForecast, parameter: &str) -> Vec<String> {
    raw.parameters.get(parameter).cloned().unwrap_or_default()
}
