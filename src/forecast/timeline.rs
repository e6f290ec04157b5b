//! Timeline normalizer
//!
//! Turns the raw string arrays of a decoded forecast run into typed,
//! index-aligned [`HourlyRecord`]s. Data-quality problems degrade to
//! absent values or dropped parameters; only an unparsable timestamp is a
//! contract violation that fails the run.

use std::collections::HashMap;

use chrono::DateTime;
use tracing::warn;

use crate::data::{HourlyRecord, RawForecast, MISSING_SENTINEL};

use super::{SummaryError, CONDITION_PARAMETER};

/// Builds one record per timestep from the raw parallel arrays.
///
/// A parameter whose array length does not match the timestep count is
/// dropped for the whole run with a warning. A raw token equal to the
/// missing sentinel, or unparsable as a number, becomes an absent value.
///
/// Records come back in chronological order: input order is kept as-is
/// when already monotonic, otherwise the records are stably sorted by
/// timestamp and a warning is logged.
pub fn normalize(raw: &RawForecast) -> Result<Vec<HourlyRecord>, SummaryError> {
    let step_count = raw.time_steps.len();

    let mut usable: Vec<(&str, &[String])> = Vec::with_capacity(raw.parameters.len());
    for (name, tokens) in &raw.parameters {
        if tokens.len() == step_count {
            usable.push((name.as_str(), tokens.as_slice()));
        } else {
            warn!(
                parameter = %name,
                expected = step_count,
                actual = tokens.len(),
                "parameter array length mismatch, dropping parameter for this run"
            );
        }
    }

    let mut records = Vec::with_capacity(step_count);
    for (index, step) in raw.time_steps.iter().enumerate() {
        let timestamp = DateTime::parse_from_rfc3339(step).map_err(|source| {
            SummaryError::InvalidTimestamp {
                value: step.clone(),
                source,
            }
        })?;

        let mut values = HashMap::with_capacity(usable.len());
        for (name, tokens) in &usable {
            values.insert((*name).to_string(), parse_token(&tokens[index]));
        }

        let condition_code = values
            .get(CONDITION_PARAMETER)
            .copied()
            .flatten()
            .filter(|code| *code >= 0.0)
            .map(|code| code.trunc() as u16);

        records.push(HourlyRecord {
            index,
            timestamp,
            condition_code,
            values,
        });
    }

    let chronological = records
        .windows(2)
        .all(|pair| pair[0].timestamp <= pair[1].timestamp);
    if !chronological {
        warn!("forecast timestamps are not chronological, sorting records");
        records.sort_by_key(|record| record.timestamp);
    }

    Ok(records)
}

/// Parses one raw value token; sentinel and junk become absent.
fn parse_token(token: &str) -> Option<f64> {
    if token == MISSING_SENTINEL {
        return None;
    }
    token.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_with(parameters: &[(&str, &[&str])]) -> RawForecast {
        let mut raw = RawForecast {
            station_name: "P755".to_string(),
            station_description: "ASCHHEIM".to_string(),
            time_steps: vec![
                "2025-08-06T05:00:00.000Z".to_string(),
                "2025-08-06T06:00:00.000Z".to_string(),
                "2025-08-06T07:00:00.000Z".to_string(),
            ],
            parameters: HashMap::new(),
        };
        for (name, tokens) in parameters {
            raw.parameters.insert(
                name.to_string(),
                tokens.iter().map(|t| t.to_string()).collect(),
            );
        }
        raw
    }

    #[test]
    fn test_records_align_with_time_steps() {
        let raw = raw_with(&[("TTT", &["288.15", "289.25", "290.05"])]);
        let records = normalize(&raw).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].index, 0);
        assert_eq!(records[2].index, 2);
        assert_eq!(records[1].value("TTT"), Some(289.25));
        assert_eq!(records[1].timestamp.to_rfc3339(), "2025-08-06T06:00:00+00:00");
    }

    #[test]
    fn test_sentinel_and_junk_tokens_become_absent() {
        let raw = raw_with(&[("RR1c", &["0.20", "-", "n/a"])]);
        let records = normalize(&raw).unwrap();

        assert_eq!(records[0].value("RR1c"), Some(0.2));
        assert_eq!(records[1].value("RR1c"), None);
        assert_eq!(records[2].value("RR1c"), None);
    }

    #[test]
    fn test_condition_code_is_truncated_integer() {
        let raw = raw_with(&[("ww", &["61.00", "2.70", "-"])]);
        let records = normalize(&raw).unwrap();

        assert_eq!(records[0].condition_code, Some(61));
        assert_eq!(records[1].condition_code, Some(2));
        assert_eq!(records[2].condition_code, None);
    }

    #[test]
    fn test_missing_condition_parameter_leaves_codes_absent() {
        let raw = raw_with(&[("TTT", &["288.15", "289.25", "290.05"])]);
        let records = normalize(&raw).unwrap();

        assert!(records.iter().all(|r| r.condition_code.is_none()));
    }

    #[test]
    fn test_length_mismatch_drops_parameter_but_not_run() {
        let raw = raw_with(&[
            ("TTT", &["288.15", "289.25", "290.05"]),
            ("Neff", &["80.0", "90.0"]),
        ]);
        let records = normalize(&raw).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].value("TTT"), Some(288.15));
        assert_eq!(records[0].value("Neff"), None);
        assert!(!records[0].values.contains_key("Neff"));
    }

    #[test]
    fn test_out_of_order_input_is_sorted() {
        let mut raw = raw_with(&[("TTT", &["288.15", "289.25", "290.05"])]);
        raw.time_steps.swap(0, 2);

        let records = normalize(&raw).unwrap();
        assert_eq!(records[0].timestamp.to_rfc3339(), "2025-08-06T05:00:00+00:00");
        assert_eq!(records[2].timestamp.to_rfc3339(), "2025-08-06T07:00:00+00:00");
        // Indexes still point at the raw arrays
        assert_eq!(records[0].index, 2);
        assert_eq!(records[0].value("TTT"), Some(290.05));
    }

    #[test]
    fn test_unparsable_timestamp_fails_the_run() {
        let mut raw = raw_with(&[]);
        raw.time_steps[1] = "not a timestamp".to_string();

        let result = normalize(&raw);
        assert!(matches!(
            result,
            Err(SummaryError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn test_offset_is_preserved() {
        let mut raw = raw_with(&[]);
        raw.time_steps = vec!["2025-08-06T07:00:00+02:00".to_string()];

        let records = normalize(&raw).unwrap();
        assert_eq!(records[0].timestamp.offset().local_minus_utc(), 7200);
    }
}
